//! Chime playback on the default output device
//!
//! Every cue opens its own short-lived cpal output stream. The stream is kept
//! alive in a voice list until its tones have finished and is then dropped,
//! which closes it. Failures never reach the caller: they are logged and
//! shown in the status line, and the session carries on silently.

use std::time::Instant;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use super::chime::Chime;

/// Errors that can occur while opening a chime stream
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No output device available")]
    NoOutputDevice,

    #[error("Failed to get output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("Failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("Failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// A chime stream that is still sounding
struct Voice {
    _stream: cpal::Stream,
    until: Instant,
}

/// Plays chimes on demand
pub struct ChimePlayer {
    voices: Vec<Voice>,

    /// Status message
    pub status: String,
}

impl Default for ChimePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChimePlayer {
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            status: "Audio idle".to_string(),
        }
    }

    /// Check that an output device is reachable before the first cue
    pub fn prime(&mut self) {
        let host = cpal::default_host();
        match host.default_output_device() {
            Some(device) => {
                let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
                log::info!("Audio output device: {}", name);
                self.status = format!("Audio: {}", name);
            }
            None => {
                log::warn!("Audio output not available: {}", AudioError::NoOutputDevice);
                self.status = "Audio unavailable".to_string();
            }
        }
    }

    /// Play one chime. Errors are logged, never returned.
    pub fn play(&mut self) {
        let now = Instant::now();
        self.prune(now);

        match open_chime_stream() {
            Ok(stream) => {
                self.voices.push(Voice {
                    _stream: stream,
                    until: now + Chime::duration(),
                });
                log::info!("Chime playing ({} active)", self.voices.len());
            }
            Err(e) => {
                log::warn!("Audio output not available: {}", e);
                self.status = format!("Audio unavailable: {}", e);
            }
        }
    }

    /// Drop streams whose chime has finished
    pub fn prune(&mut self, now: Instant) {
        let before = self.voices.len();
        self.voices.retain(|voice| voice.until > now);
        let closed = before - self.voices.len();
        if closed > 0 {
            log::debug!("Closed {} finished chime stream(s)", closed);
        }
    }
}

/// Open and start an output stream rendering one chime
fn open_chime_stream() -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)?;

    let config = device.default_output_config()?;
    log::debug!("Chime output config: {:?}", config);

    let channels = config.channels() as usize;
    let chime = Chime::new(config.sample_rate().0);
    let end = chime.frames();
    let mut frame: u64 = 0;

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for out in data.chunks_mut(channels) {
                    let value = if frame < end { chime.sample(frame) } else { 0.0 };
                    frame += 1;
                    out.fill(value);
                }
            },
            |err| log::error!("Audio output error: {}", err),
            None,
        )?,
        cpal::SampleFormat::I16 => device.build_output_stream(
            &config.into(),
            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                for out in data.chunks_mut(channels) {
                    let value = if frame < end { chime.sample(frame) } else { 0.0 };
                    frame += 1;
                    out.fill((value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16);
                }
            },
            |err| log::error!("Audio output error: {}", err),
            None,
        )?,
        format => return Err(AudioError::UnsupportedFormat(format)),
    };

    stream.play()?;
    Ok(stream)
}
