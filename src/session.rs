//! Session state and cue triggering
//!
//! A `Session` is a plain value. Every user action and every timer tick is a
//! transition that takes the current session and returns the next one, so the
//! whole timing model can be driven from tests without a window or an audio
//! device.
//!
//! ## Cue policy
//!
//! A mark fires on the first transition where `elapsed >= mark` and the mark
//! has not fired yet. With one tick per second this is the same as an exact
//! match, but it also covers a stalled frame loop that delivers several ticks
//! at once: every mark crossed by the jump fires, none is skipped.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Elapsed-time marks (seconds from start) at which a breathing cue fires
pub const CUE_MARKS: [u64; 5] = [2 * 60, 4 * 60, 10 * 60, 17 * 60, 27 * 60];

/// How long the visual cue stays active after a mark fires
pub const CUE_FLASH: Duration = Duration::from_secs(1);

/// Coarse phase of a session, derived from `running` and `elapsed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// An active visual cue and the instant it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueFlash {
    pub mark: u64,
    pub until: Instant,
}

/// Marks fired by a single transition
///
/// Normally empty or a single mark. A multi-second jump may cross several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fired(Vec<u64>);

impl Fired {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn marks(&self) -> &[u64] {
        &self.0
    }
}

/// Timer session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    elapsed: u64,
    running: bool,
    fired: BTreeSet<u64>,
    flash: Option<CueFlash>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_fired(&self, mark: u64) -> bool {
        self.fired.contains(&mark)
    }

    pub fn flash(&self) -> Option<CueFlash> {
        self.flash
    }

    pub fn is_cue_animating(&self) -> bool {
        self.flash.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (self.running, self.elapsed) {
            (true, _) => Phase::Running,
            (false, 0) => Phase::Idle,
            (false, _) => Phase::Paused,
        }
    }

    /// Start or resume. Starting a running session changes nothing.
    #[must_use]
    pub fn start(self) -> Self {
        Self {
            running: true,
            ..self
        }
    }

    /// Pause, keeping elapsed time and fired marks
    #[must_use]
    pub fn stop(self) -> Self {
        Self {
            running: false,
            ..self
        }
    }

    /// Back to the initial idle state, whatever came before
    #[must_use]
    pub fn reset(self) -> Self {
        Self::new()
    }

    /// Advance elapsed time by `seconds` and fire every mark reached.
    ///
    /// Ignored while paused or idle.
    #[must_use]
    pub fn advance(mut self, seconds: u64, now: Instant) -> (Self, Fired) {
        if !self.running || seconds == 0 {
            return (self, Fired::default());
        }

        self.elapsed = self.elapsed.saturating_add(seconds);

        let due: Vec<u64> = CUE_MARKS
            .iter()
            .copied()
            .filter(|mark| *mark <= self.elapsed && !self.fired.contains(mark))
            .collect();

        if let Some(&last) = due.last() {
            self.fired.extend(due.iter().copied());
            self.flash = Some(CueFlash {
                mark: last,
                until: now + CUE_FLASH,
            });
        }

        (self, Fired(due))
    }

    /// End the visual cue once its deadline has passed
    #[must_use]
    pub fn expire(mut self, now: Instant) -> Self {
        if self.flash.is_some_and(|flash| now >= flash.until) {
            self.flash = None;
        }
        self
    }

    /// The first mark still ahead of elapsed time
    pub fn next_mark(&self) -> Option<u64> {
        CUE_MARKS.iter().copied().find(|mark| *mark > self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_for(mut session: Session, seconds: u64, now: Instant) -> (Session, Vec<u64>) {
        let mut fired = Vec::new();
        for _ in 0..seconds {
            let (next, cues) = session.advance(1, now);
            fired.extend_from_slice(cues.marks());
            session = next;
        }
        (session, fired)
    }

    fn fired_marks(session: &Session) -> Vec<u64> {
        CUE_MARKS
            .iter()
            .copied()
            .filter(|m| session.has_fired(*m))
            .collect()
    }

    #[test]
    fn test_initial_state_is_idle() {
        let session = Session::new();
        assert_eq!(session.elapsed(), 0);
        assert!(!session.is_running());
        assert!(fired_marks(&session).is_empty());
        assert!(!session.is_cue_animating());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_tick_ignored_when_not_running() {
        let now = Instant::now();
        let (session, fired) = Session::new().advance(1, now);
        assert_eq!(session, Session::new());
        assert!(fired.is_empty());
    }

    #[test]
    fn test_start_is_idempotent() {
        let once = Session::new().start();
        let twice = once.clone().start();
        assert_eq!(once, twice);
        assert_eq!(twice.phase(), Phase::Running);
    }

    #[test]
    fn test_elapsed_matches_running_seconds() {
        let now = Instant::now();
        for n in [0, 1, 119, 120, 121, 600, 1619, 1620, 2000] {
            let (session, _) = run_for(Session::new().start(), n, now);
            assert_eq!(session.elapsed(), n);
            let expected: Vec<u64> = CUE_MARKS.iter().copied().filter(|m| *m <= n).collect();
            assert_eq!(fired_marks(&session), expected, "after {} seconds", n);
        }
    }

    #[test]
    fn test_first_mark_fires_once() {
        let now = Instant::now();
        let (session, fired) = run_for(Session::new().start(), 120, now);
        assert_eq!(fired, vec![120]);
        assert!(session.has_fired(120));
        assert!(session.is_cue_animating());
        assert_eq!(session.next_mark(), Some(240));

        let (session, fired) = run_for(session, 60, now);
        assert!(fired.is_empty());
        assert_eq!(fired_marks(&session), vec![120]);
    }

    #[test]
    fn test_fired_marks_are_subset_of_cue_marks() {
        let now = Instant::now();
        let (session, fired) = run_for(Session::new().start(), 3000, now);
        assert_eq!(fired, CUE_MARKS.to_vec());
        assert_eq!(session.fired, CUE_MARKS.iter().copied().collect::<BTreeSet<u64>>());
        assert_eq!(session.next_mark(), None);
    }

    #[test]
    fn test_pause_and_resume_keep_progress() {
        let now = Instant::now();
        let (session, _) = run_for(Session::new().start(), 250, now);
        let paused = session.stop();
        assert_eq!(paused.phase(), Phase::Paused);

        let (paused, fired) = run_for(paused, 30, now);
        assert!(fired.is_empty());
        assert_eq!(paused.elapsed(), 250);

        let resumed = paused.start();
        assert_eq!(resumed.elapsed(), 250);
        assert!(resumed.has_fired(120));
        assert!(resumed.has_fired(240));
    }

    #[test]
    fn test_reset_mid_session() {
        let now = Instant::now();
        let (session, _) = run_for(Session::new().start(), 300, now);
        assert_eq!(fired_marks(&session), vec![120, 240]);

        let session = session.reset();
        assert_eq!(session, Session::new());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_clears_active_flash() {
        let now = Instant::now();
        let (session, _) = run_for(Session::new().start(), 120, now);
        assert!(session.is_cue_animating());

        let session = session.reset().expire(now + CUE_FLASH);
        assert!(!session.is_cue_animating());
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_flash_expires_after_one_second() {
        let now = Instant::now();
        let (session, _) = run_for(Session::new().start(), 120, now);

        let session = session.expire(now + Duration::from_millis(999));
        assert!(session.is_cue_animating());

        let session = session.expire(now + CUE_FLASH);
        assert!(!session.is_cue_animating());
        assert!(session.is_running());
    }

    #[test]
    fn test_jump_fires_every_crossed_mark() {
        let now = Instant::now();
        let (session, fired) = Session::new().start().advance(700, now);
        assert_eq!(fired.marks(), &[120, 240, 600]);
        assert_eq!(session.flash().map(|f| f.mark), Some(600));

        let (session, fired) = session.advance(10, now);
        assert!(fired.is_empty());
        assert_eq!(session.elapsed(), 710);
    }

    #[test]
    fn test_phase_transitions() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        // Stopping before any tick lands back in idle
        assert_eq!(session.clone().start().stop().phase(), Phase::Idle);

        let (session, _) = session.start().advance(1, Instant::now());
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.clone().stop().phase(), Phase::Paused);
        assert_eq!(session.reset().phase(), Phase::Idle);
    }
}
