//! Configuration for CueTone

use crate::error::{CueToneError, Result};

/// Peak gain used by every tone that does not ask for its own.
pub const DEFAULT_PEAK_GAIN: f32 = 0.3;

/// Gain the exponential envelope reaches at the end of a tone.
pub const DEFAULT_RELEASE_FLOOR: f32 = 0.01;

/// Configuration descriptor for a CueTone engine and its output context
#[derive(Debug, Clone)]
pub struct CueToneDesc {
    /// Preferred output sample rate (None uses the device default)
    pub sample_rate: Option<u32>,
    /// Preferred output channel count (None uses the device default)
    pub channels: Option<u16>,
    /// Starting gain of the envelope for tones without an explicit peak
    pub peak_gain: f32,
    /// Gain the envelope decays to at the end of each tone
    pub release_floor: f32,
    /// Maximum number of simultaneously sounding voices
    pub max_voices: usize,
    /// Capacity of the command channel between the engine and the renderer
    pub command_capacity: usize,
}

impl Default for CueToneDesc {
    fn default() -> Self {
        Self {
            sample_rate: None,
            channels: None,
            peak_gain: DEFAULT_PEAK_GAIN,
            release_floor: DEFAULT_RELEASE_FLOOR,
            max_voices: 64,
            command_capacity: 256,
        }
    }
}

impl CueToneDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn peak_gain(mut self, gain: f32) -> Self {
        self.peak_gain = gain;
        self
    }

    pub fn release_floor(mut self, floor: f32) -> Self {
        self.release_floor = floor;
        self
    }

    pub fn max_voices(mut self, max: usize) -> Self {
        self.max_voices = max;
        self
    }

    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    /// Checks the descriptor for values the renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == Some(0) {
            return Err(CueToneError::Configuration(
                "sample rate must be non-zero".into(),
            ));
        }
        if self.channels == Some(0) {
            return Err(CueToneError::Configuration(
                "channel count must be non-zero".into(),
            ));
        }
        if !(self.peak_gain.is_finite() && self.peak_gain > 0.0) {
            return Err(CueToneError::Configuration(format!(
                "peak gain must be positive, got {}",
                self.peak_gain
            )));
        }
        if !(self.release_floor.is_finite() && self.release_floor > 0.0) {
            return Err(CueToneError::Configuration(format!(
                "release floor must be positive, got {}",
                self.release_floor
            )));
        }
        if self.max_voices == 0 || self.command_capacity == 0 {
            return Err(CueToneError::Configuration(
                "voice limit and command capacity must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
