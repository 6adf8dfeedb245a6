//! Audio module - breathing cue sound
//!
//! This module provides:
//! - Chime synthesis (three staggered, decaying sine tones)
//! - Per-cue playback on the default output device

mod chime;
mod player;

pub use player::ChimePlayer;
