//! What the screen should show for a given session
//!
//! Everything here is derived from a `Session` and nothing else, so the
//! display rules can be tested without egui.

use crate::session::{Phase, Session, CUE_MARKS};

pub const COMPLETE_MESSAGE: &str = "All intervals complete! Well done!";
pub const CUE_BANNER: &str = "Breathing Cue!";
pub const RUNNING_HINT: &str = "Session in progress... Keep breathing mindfully";

/// Display state of one cue mark badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    /// Mark still ahead
    Pending,
    /// Time has reached the mark but the cue has not been recorded yet
    Reached,
    /// Cue played
    Fired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub mark: u64,
    pub label: String,
    pub state: BadgeState,
}

/// Label and action of the primary button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryControl {
    Start,
    Resume,
    Pause,
}

impl PrimaryControl {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "🎯 Start Session",
            Self::Resume => "▶ Resume",
            Self::Pause => "⏸ Pause",
        }
    }
}

/// Status line under the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Countdown {
    /// Time left until the next mark, formatted `mm:ss`
    Next(String),
    /// Every mark is behind us
    Complete,
    /// Nothing to show (idle at zero)
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub clock: String,
    pub countdown: Countdown,
    pub badges: Vec<Badge>,
    pub primary: PrimaryControl,
    /// Mark whose cue is flashing right now
    pub cue_mark: Option<u64>,
    pub running: bool,
}

impl SessionView {
    pub fn cue_active(&self) -> bool {
        self.cue_mark.is_some()
    }

    pub fn from_session(session: &Session) -> Self {
        let elapsed = session.elapsed();

        let countdown = match session.next_mark() {
            Some(mark) => Countdown::Next(format_clock(mark - elapsed)),
            None if elapsed > 0 => Countdown::Complete,
            None => Countdown::Hidden,
        };

        let badges = CUE_MARKS
            .iter()
            .map(|&mark| Badge {
                mark,
                label: format_clock(mark),
                state: badge_state(session, mark),
            })
            .collect();

        let primary = match session.phase() {
            Phase::Idle => PrimaryControl::Start,
            Phase::Paused => PrimaryControl::Resume,
            Phase::Running => PrimaryControl::Pause,
        };

        Self {
            clock: format_clock(elapsed),
            countdown,
            badges,
            primary,
            cue_mark: session.flash().map(|flash| flash.mark),
            running: session.is_running(),
        }
    }
}

fn badge_state(session: &Session, mark: u64) -> BadgeState {
    if session.has_fired(mark) {
        BadgeState::Fired
    } else if session.elapsed() >= mark {
        BadgeState::Reached
    } else {
        BadgeState::Pending
    }
}

/// Format seconds as `mm:ss`. Minutes are not wrapped at an hour.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
