//! Chime synthesis
//!
//! Three sine tones rising in pitch, each entering 100ms after the previous
//! one and fading exponentially over 4.5 seconds.

use std::f32::consts::TAU;
use std::time::Duration;

/// Tone frequencies in Hz, in the order they enter
pub const CHIME_FREQUENCIES: [f32; 3] = [800.0, 1000.0, 1200.0];

/// Delay between the start of consecutive tones
pub const TONE_STAGGER: Duration = Duration::from_millis(100);

/// Length of each tone
pub const TONE_DURATION: Duration = Duration::from_millis(4500);

/// Gain at the start of each tone
pub const START_GAIN: f32 = 0.3;

/// Gain reached at the end of each tone
pub const END_GAIN: f32 = 0.01;

/// A single rendered cue at a fixed sample rate
#[derive(Debug, Clone, Copy)]
pub struct Chime {
    sample_rate: u32,
}

impl Chime {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
        }
    }

    /// Total length from the first tone's start to the last tone's end
    pub fn duration() -> Duration {
        TONE_STAGGER * (CHIME_FREQUENCIES.len() as u32 - 1) + TONE_DURATION
    }

    /// Total length in frames at this chime's sample rate
    pub fn frames(&self) -> u64 {
        self.to_frames(Self::duration())
    }

    /// Mono sample value at `frame`
    pub fn sample(&self, frame: u64) -> f32 {
        let stagger = self.to_frames(TONE_STAGGER);
        let length = self.to_frames(TONE_DURATION);
        let rate = self.sample_rate as f32;

        CHIME_FREQUENCIES
            .iter()
            .enumerate()
            .map(|(i, freq)| {
                let Some(local) = frame.checked_sub(i as u64 * stagger) else {
                    return 0.0;
                };
                if local >= length {
                    return 0.0;
                }
                let t = local as f32 / rate;
                envelope(t, TONE_DURATION.as_secs_f32()) * (TAU * freq * t).sin()
            })
            .sum()
    }

    fn to_frames(&self, d: Duration) -> u64 {
        (d.as_nanos() * self.sample_rate as u128).div_ceil(1_000_000_000) as u64
    }
}

/// Exponential ramp from `START_GAIN` to `END_GAIN` across `length` seconds
fn envelope(t: f32, length: f32) -> f32 {
    START_GAIN * (END_GAIN / START_GAIN).powf(t / length)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 48_000;

    #[test]
    fn test_duration_covers_all_tones() {
        assert_eq!(Chime::duration(), Duration::from_millis(4700));
        assert_eq!(Chime::new(RATE).frames(), 225_600);
    }

    #[test]
    fn test_envelope_endpoints() {
        assert!((envelope(0.0, 4.5) - START_GAIN).abs() < 1e-6);
        assert!((envelope(4.5, 4.5) - END_GAIN).abs() < 1e-6);
        assert!(envelope(2.0, 4.5) < envelope(1.0, 4.5));
    }

    #[test]
    fn test_silent_outside_tones() {
        let chime = Chime::new(RATE);
        assert_eq!(chime.sample(0), 0.0);
        assert_eq!(chime.sample(chime.frames()), 0.0);
        assert_eq!(chime.sample(chime.frames() * 2), 0.0);
    }

    #[test]
    fn test_only_first_tone_before_stagger() {
        let chime = Chime::new(RATE);
        // A quarter period of 800 Hz lands on the sine peak
        let frame = RATE as u64 / 800 / 4;
        let t = frame as f32 / RATE as f32;
        let expected = envelope(t, 4.5) * (TAU * 800.0 * t).sin();
        assert!((chime.sample(frame) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_peak_stays_in_range() {
        let chime = Chime::new(RATE);
        let peak = (0..chime.frames())
            .step_by(7)
            .map(|f| chime.sample(f).abs())
            .fold(0.0_f32, f32::max);
        assert!(peak <= 1.0);
        assert!(peak > START_GAIN * 0.5);
    }
}
