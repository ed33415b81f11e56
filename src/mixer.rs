// Mixer module - turns render commands into samples
// Runs on the audio callback thread; everything the engine asks for arrives
// through the command channel.

use crate::config::CueToneDesc;
use crate::cue::{Cue, CueStep};
use crate::playback::{RenderCommand, ToneVoice};
use crate::scheduler::{ScheduledTone, ToneScheduler};
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces the output signal of one audio context.
///
/// Owns the scheduler and every sounding voice. The frame clock is shared
/// with the context so the engine side can read the current output position.
pub struct Renderer {
    commands: Receiver<RenderCommand>,
    scheduler: ToneScheduler,
    voices: Vec<ToneVoice>,
    clock: Arc<AtomicU64>,
    peak_gain: f32,
    release_floor: f32,
    max_voices: usize,
}

impl Renderer {
    pub fn new(
        desc: &CueToneDesc,
        commands: Receiver<RenderCommand>,
        clock: Arc<AtomicU64>,
    ) -> Self {
        Self {
            commands,
            scheduler: ToneScheduler::with_capacity(desc.command_capacity * Cue::max_steps()),
            voices: Vec::with_capacity(desc.max_voices),
            clock,
            peak_gain: desc.peak_gain,
            release_floor: desc.release_floor,
            max_voices: desc.max_voices,
        }
    }

    /// Frames rendered so far
    pub fn current_frame(&self) -> u64 {
        self.clock.load(Ordering::Relaxed)
    }

    /// Pending tones, ordered by due frame
    pub fn scheduled(&self) -> impl Iterator<Item = &ScheduledTone> {
        self.scheduler.iter()
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Moves every queued command into the scheduler without rendering.
    ///
    /// Offsets are measured from the current frame clock.
    pub fn sync(&mut self, sample_rate: u32) {
        let now = self.current_frame();

        while let Ok(command) = self.commands.try_recv() {
            match command {
                RenderCommand::Cue(cue) => {
                    for step in cue.steps() {
                        self.schedule_step(now, step, sample_rate);
                    }
                }
                RenderCommand::Tone(step) => self.schedule_step(now, &step, sample_rate),
                RenderCommand::CancelPending => {
                    let dropped = self.scheduler.clear();
                    if dropped > 0 {
                        log::debug!("Renderer: cancelled {} pending tones", dropped);
                    }
                }
            }
        }
    }

    // An offset past the end of the frame clock never comes due
    fn schedule_step(&mut self, now: u64, step: &CueStep, sample_rate: u32) {
        let offset = (step.offset.as_secs_f64() * sample_rate as f64).round() as u64;
        self.scheduler.schedule(now.saturating_add(offset), step.tone);
    }

    /// Fill `buffer` with the mix of every sounding voice.
    ///
    /// `buffer` is interleaved with `channels` samples per frame and is
    /// overwritten. Returns the number of frames rendered.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: u32, channels: u16) -> usize {
        buffer.fill(0.0);
        if channels == 0 || sample_rate == 0 {
            return 0;
        }

        self.sync(sample_rate);

        let frame_count = buffer.len() / channels as usize;
        let block_start = self.current_frame();
        let block_end = block_start + frame_count as u64;

        for entry in self.scheduler.pop_due(block_end) {
            if self.voices.len() >= self.max_voices {
                log::debug!(
                    "Renderer: voice limit {} reached, dropping {}",
                    self.max_voices,
                    entry.tone
                );
                continue;
            }

            let peak = entry.tone.peak_gain_or(self.peak_gain);
            let start = entry.due_frame.saturating_sub(block_start) as usize;
            let voice = ToneVoice::new(entry.tone, peak, self.release_floor, sample_rate);
            self.voices.push(voice.starting_at(start));
        }

        for voice in self.voices.iter_mut() {
            voice.fill_buffer(buffer, channels);
        }
        self.voices.retain(|voice| !voice.is_finished());

        self.clock.store(block_end, Ordering::Relaxed);
        frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::{Tone, Waveform};
    use crossbeam_channel::{Sender, bounded};
    use std::time::Duration;

    const RATE: u32 = 48000;

    fn renderer(desc: &CueToneDesc) -> (Sender<RenderCommand>, Renderer) {
        let (sender, receiver) = bounded(desc.command_capacity);
        let renderer = Renderer::new(desc, receiver, Arc::new(AtomicU64::new(0)));
        (sender, renderer)
    }

    fn schedule_cue(sender: &Sender<RenderCommand>, cue: Cue) {
        sender.send(RenderCommand::Cue(cue)).unwrap();
    }

    #[test]
    fn load_cue_lands_on_200ms_grid() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        schedule_cue(&sender, Cue::Load);
        renderer.sync(RATE);

        let pending: Vec<(u64, f32)> = renderer
            .scheduled()
            .map(|e| (e.due_frame, e.tone.frequency))
            .collect();
        assert_eq!(
            pending,
            vec![
                (0, 523.0),
                (9600, 587.0),
                (19200, 659.0),
                (28800, 784.0),
                (38400, 880.0),
            ]
        );
    }

    #[test]
    fn offsets_are_relative_to_clock_at_receipt() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        let mut block = vec![0.0f32; 1024];
        renderer.render(&mut block, RATE, 2);
        assert_eq!(renderer.current_frame(), 512);

        schedule_cue(&sender, Cue::Success);
        renderer.sync(RATE);
        let frames: Vec<u64> = renderer.scheduled().map(|e| e.due_frame).collect();
        assert_eq!(frames, vec![512, 512 + 3840, 512 + 7680]);
    }

    #[test]
    fn renders_tone_at_exact_frame_inside_block() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        sender
            .send(RenderCommand::Tone(CueStep {
                offset: Duration::from_micros(2500),
                tone: Tone::new(1000.0, 0.01, Waveform::Square),
            }))
            .unwrap();

        let mut block = vec![0.0f32; 256];
        renderer.render(&mut block, RATE, 1);
        // 2.5ms at 48kHz
        assert!(block[..120].iter().all(|s| *s == 0.0));
        assert!((block[120] - 0.3).abs() < 1e-6);
        assert_eq!(renderer.active_voices(), 1);
    }

    #[test]
    fn finished_voices_are_removed() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        schedule_cue(&sender, Cue::Hover);

        let mut block = vec![0.0f32; 2048];
        renderer.render(&mut block, RATE, 2);
        assert_eq!(renderer.active_voices(), 1);

        for _ in 0..3 {
            renderer.render(&mut block, RATE, 2);
        }
        // 50ms = 2400 frames, four blocks of 1024 frames cover it
        assert_eq!(renderer.active_voices(), 0);
        assert!(block.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn whoosh_uses_its_own_peak() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        schedule_cue(&sender, Cue::Whoosh);

        let mut block = vec![0.0f32; 4800];
        renderer.render(&mut block, RATE, 1);
        let peak = block.iter().fold(0.0f32, |max, s| max.max(s.abs()));
        assert!(peak <= 0.08 + 1e-6, "peak {}", peak);
        assert!(peak > 0.07, "peak {}", peak);
    }

    #[test]
    fn cancel_pending_keeps_sounding_voices() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        schedule_cue(&sender, Cue::Load);

        let mut block = vec![0.0f32; 1024];
        renderer.render(&mut block, RATE, 1);
        assert_eq!(renderer.active_voices(), 1);
        assert_eq!(renderer.scheduled().count(), 4);

        sender.send(RenderCommand::CancelPending).unwrap();
        renderer.render(&mut block, RATE, 1);
        assert_eq!(renderer.scheduled().count(), 0);
        assert_eq!(renderer.active_voices(), 1);
    }

    #[test]
    fn voice_limit_drops_extra_tones() {
        let desc = CueToneDesc::default().max_voices(2);
        let (sender, mut renderer) = renderer(&desc);
        for _ in 0..5 {
            schedule_cue(&sender, Cue::Click);
        }

        let mut block = vec![0.0f32; 512];
        renderer.render(&mut block, RATE, 1);
        assert_eq!(renderer.active_voices(), 2);
        assert_eq!(renderer.scheduled().count(), 0);
    }

    #[test]
    fn overlapping_cues_mix() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        schedule_cue(&sender, Cue::Click);
        schedule_cue(&sender, Cue::Click);

        let mut block = vec![0.0f32; 64];
        renderer.render(&mut block, RATE, 1);
        assert!((block[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn unreachable_offset_is_never_due() {
        let (sender, mut renderer) = renderer(&CueToneDesc::default());
        let mut block = vec![0.0f32; 512];
        renderer.render(&mut block, RATE, 1);

        sender
            .send(RenderCommand::Tone(CueStep {
                offset: Duration::MAX,
                tone: Tone::new(440.0, 0.1, Waveform::Sine),
            }))
            .unwrap();
        renderer.render(&mut block, RATE, 1);

        let due: Vec<u64> = renderer.scheduled().map(|e| e.due_frame).collect();
        assert_eq!(due, vec![u64::MAX]);
        assert_eq!(renderer.active_voices(), 0);
        assert!(block.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn scheduler_holds_a_full_command_queue() {
        let desc = CueToneDesc::default().command_capacity(8);
        let (_, renderer) = renderer(&desc);
        assert!(renderer.scheduler.capacity() >= 8 * 5);
    }
}
