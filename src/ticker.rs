//! Once-per-second tick source
//!
//! The egui frame loop polls the ticker every frame. Frames are not evenly
//! spaced, so the ticker keeps an anchor instant and counts whole periods
//! since it instead of counting frames.

use std::time::{Duration, Instant};

use crate::session::{Fired, Session};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    anchor: Option<Instant>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            anchor: None,
        }
    }

    /// Begin counting from `now`. A running ticker keeps its anchor.
    pub fn start(&mut self, now: Instant) {
        if self.anchor.is_none() {
            log::debug!("Ticker started");
            self.anchor = Some(now);
        }
    }

    /// Stop counting. Any partial period is discarded.
    pub fn stop(&mut self) {
        if self.anchor.take().is_some() {
            log::debug!("Ticker stopped");
        }
    }

    /// Number of whole periods completed since the last poll
    pub fn poll(&mut self, now: Instant) -> u64 {
        let Some(anchor) = self.anchor else {
            return 0;
        };

        let since = now.saturating_duration_since(anchor);
        let ticks = (since.as_nanos() / self.period.as_nanos().max(1)) as u64;
        if ticks > 0 {
            let step = self.period.saturating_mul(ticks.min(u32::MAX as u64) as u32);
            self.anchor = Some(anchor + step);
            if ticks > 1 {
                log::debug!("Ticker catching up {} periods", ticks);
            }
        }
        ticks
    }

    /// Time left until the next tick, if running
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.anchor.map(|anchor| {
            let since = now.saturating_duration_since(anchor);
            self.period.saturating_sub(since)
        })
    }
}

/// Feed due ticks into the session and retire an expired cue flash.
///
/// Returns the marks fired on this call; the caller plays the chime.
pub fn drive(ticker: &mut Ticker, session: Session, now: Instant) -> (Session, Fired) {
    let ticks = ticker.poll(now);
    let (session, fired) = session.advance(ticks, now);
    (session.expire(now), fired)
}
