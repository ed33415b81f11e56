//! Voice playback and render commands.
//!
//! - [`PlayState`]: whether a voice is still sounding
//! - [`ToneVoice`]: one oscillator instance rendering one [`Tone`]
//! - [`RenderCommand`]: requests sent from the engine to the renderer (internal)
//!
//! Users trigger sound through [`CueToneEngine`](crate::CueToneEngine) and
//! never touch voices directly.

use crate::cue::{Cue, CueStep};
use crate::tone::{Envelope, Tone};

/// Playback state of a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// Still producing samples
    Playing,
    /// Reached the end of its tone
    Stopped,
}

/// An independent oscillator for a single tone.
///
/// Each voice owns its phase and envelope position, so any number of
/// overlapping tones simply add up in the mix.
#[derive(Debug, Clone)]
pub struct ToneVoice {
    tone: Tone,
    envelope: Envelope,
    phase: f32,
    phase_step: f32,
    gain: f32,
    decay: f32,
    current_frame: usize,
    total_frames: usize,
    /// Frames to skip in the next block before the voice starts
    start_offset: usize,
    play_state: PlayState,
}

impl ToneVoice {
    pub fn new(tone: Tone, peak_gain: f32, release_floor: f32, sample_rate: u32) -> Self {
        // two frames at least, so the last sample sits on the release floor
        let total_frames = ((tone.duration as f64 * sample_rate as f64).round() as usize).max(2);
        let envelope = Envelope::new(peak_gain, release_floor, tone.duration);
        Self {
            tone,
            envelope,
            phase: 0.0,
            phase_step: tone.frequency / sample_rate as f32,
            gain: envelope.peak(),
            decay: envelope.decay_per_frame(total_frames),
            current_frame: 0,
            total_frames,
            start_offset: 0,
            play_state: PlayState::Playing,
        }
    }

    /// Delay the start of this voice by `frames` within the next block.
    pub fn starting_at(mut self, frames: usize) -> Self {
        self.start_offset = frames;
        self
    }

    pub fn tone(&self) -> &Tone {
        &self.tone
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn is_finished(&self) -> bool {
        self.play_state == PlayState::Stopped
    }

    /// Mix this voice into an interleaved buffer.
    ///
    /// The mono signal is added to every channel. Returns the index one past
    /// the last frame written, so callers can tell how much of the block this
    /// voice covered.
    pub fn fill_buffer(&mut self, buffer: &mut [f32], channels: u16) -> usize {
        if self.play_state != PlayState::Playing || channels == 0 {
            return 0;
        }

        let channels = channels as usize;
        let frame_count = buffer.len() / channels;
        let first_frame = self.start_offset.min(frame_count);
        self.start_offset -= first_frame;
        if self.start_offset > 0 {
            return 0;
        }

        let remaining = self.total_frames - self.current_frame;
        let last_frame = frame_count.min(first_frame + remaining);

        for frame in buffer[first_frame * channels..last_frame * channels].chunks_mut(channels) {
            let sample = self.tone.waveform.sample(self.phase) * self.gain;
            for channel_sample in frame.iter_mut() {
                *channel_sample += sample;
            }

            self.phase += self.phase_step;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
            self.gain *= self.decay;
        }

        self.advance_and_check_completion(last_frame - first_frame);
        last_frame
    }

    fn advance_and_check_completion(&mut self, frames_consumed: usize) {
        self.current_frame += frames_consumed;
        if self.current_frame >= self.total_frames {
            log::trace!(
                "Voice {} finished after {} frames",
                self.tone,
                self.current_frame
            );
            self.play_state = PlayState::Stopped;
        }
    }
}

/// Commands sent from the engine to the renderer.
///
/// Commands own no heap data, so the audio thread never frees memory while
/// draining them.
#[derive(Debug, Clone, Copy)]
pub enum RenderCommand {
    /// Start each step of the cue at its offset from the moment the renderer
    /// receives the command
    Cue(Cue),
    /// Start one tone at its offset from receipt
    Tone(CueStep),
    /// Drop every tone that has not started yet
    CancelPending,
}
