//! Tone synthesis primitives.
//!
//! - [`Waveform`]: oscillator shape
//! - [`Tone`]: one synthesis request (frequency, duration, waveform, peak gain)
//! - [`Envelope`]: fixed peak followed by exponential decay to the release floor

use crate::error::{CueToneError, Result};
use std::f32::consts::TAU;
use std::fmt;
use std::time::Duration;

/// Oscillator shape of a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `phase`, a position within one cycle in `[0, 1)`.
    ///
    /// Every shape starts at zero (square at its positive half) and rises, so
    /// all four line up with the sine at phase 0.
    pub fn sample(self, phase: f32) -> f32 {
        let phase = phase - phase.floor();
        match self {
            Self::Sine => (phase * TAU).sin(),
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            Self::Sawtooth => {
                if phase < 0.5 {
                    2.0 * phase
                } else {
                    2.0 * phase - 2.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Sawtooth => "sawtooth",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ephemeral synthesis request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz
    pub frequency: f32,
    /// Length in seconds
    pub duration: f32,
    pub waveform: Waveform,
    /// Starting gain of the envelope (None uses the engine default)
    pub peak_gain: Option<f32>,
}

impl Tone {
    pub const fn new(frequency: f32, duration: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
            peak_gain: None,
        }
    }

    pub const fn with_peak_gain(mut self, gain: f32) -> Self {
        self.peak_gain = Some(gain);
        self
    }

    pub fn length(&self) -> Duration {
        Duration::try_from_secs_f32(self.duration.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Peak gain of this tone, falling back to `default` when none was set.
    pub fn peak_gain_or(&self, default: f32) -> f32 {
        self.peak_gain.unwrap_or(default)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(CueToneError::InvalidTone(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(CueToneError::InvalidTone(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if let Some(gain) = self.peak_gain {
            if !(gain.is_finite() && gain > 0.0) {
                return Err(CueToneError::InvalidTone(format!(
                    "peak gain must be positive, got {}",
                    gain
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Hz {} for {:.3}s",
            self.frequency, self.waveform, self.duration
        )
    }
}

/// Amplitude over time of a single tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    peak: f32,
    floor: f32,
    duration: f32,
}

impl Envelope {
    /// The floor never exceeds the peak, so the envelope only ever decays.
    pub fn new(peak: f32, floor: f32, duration: f32) -> Self {
        Self {
            peak,
            floor: floor.min(peak),
            duration,
        }
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Gain `elapsed` seconds after the tone started. Zero once the tone has
    /// stopped.
    pub fn gain_at(&self, elapsed: f32) -> f32 {
        if elapsed < 0.0 || elapsed >= self.duration {
            return 0.0;
        }
        self.peak * (self.floor / self.peak).powf(elapsed / self.duration)
    }

    /// Per-frame multiplier that walks the envelope from peak to floor over
    /// `frames` frames.
    pub fn decay_per_frame(&self, frames: usize) -> f32 {
        if frames <= 1 {
            return self.floor / self.peak;
        }
        (self.floor / self.peak).powf(1.0 / (frames - 1) as f32)
    }
}
