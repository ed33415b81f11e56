//! Cue engine for CueTone

use crate::backend::{AudioBackend, CpalBackend};
use crate::config::CueToneDesc;
use crate::context::AudioContext;
use crate::cue::{Cue, CueStep};
use crate::error::Result;
use crate::toggle::SoundToggle;
use crate::tone::{Tone, Waveform};
use std::cell::OnceCell;
use std::time::Duration;

/// Lifecycle of an engine's audio context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No context yet
    Uninitialized,
    /// Context created (live or silent)
    Ready,
}

/// Turns UI events into short synthesized sounds.
///
/// The engine opens its audio context the first time a cue plays while sound
/// is enabled and keeps it until it is dropped. Every cue reads the shared
/// [`SoundToggle`] at call time and does nothing at all while it is off.
/// Cues never block, never panic and never report errors: without a usable
/// output they are silent.
pub struct CueToneEngine {
    desc: CueToneDesc,
    toggle: SoundToggle,
    backend: Box<dyn AudioBackend>,
    context: OnceCell<AudioContext>,
}

impl CueToneEngine {
    /// Create an engine that plays through the default output device
    pub fn new(desc: CueToneDesc, toggle: SoundToggle) -> Result<Self> {
        Self::with_backend(desc, toggle, CpalBackend)
    }

    /// Create an engine that plays through `backend`
    pub fn with_backend<B>(desc: CueToneDesc, toggle: SoundToggle, backend: B) -> Result<Self>
    where
        B: AudioBackend + 'static,
    {
        desc.validate()?;
        Ok(Self {
            desc,
            toggle,
            backend: Box::new(backend),
            context: OnceCell::new(),
        })
    }

    /// Returns the engine's audio context, creating it on the first call.
    ///
    /// Later calls return the same context. If the backend cannot open an
    /// output the context is silent.
    pub fn init_context(&self) -> &AudioContext {
        self.context
            .get_or_init(|| AudioContext::open(&self.desc, self.backend.as_ref()))
    }

    /// The context, if one has been created
    pub fn context(&self) -> Option<&AudioContext> {
        self.context.get()
    }

    pub fn state(&self) -> EngineState {
        if self.context.get().is_some() {
            EngineState::Ready
        } else {
            EngineState::Uninitialized
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.toggle.is_enabled()
    }

    pub fn toggle(&self) -> &SoundToggle {
        &self.toggle
    }

    pub fn desc(&self) -> &CueToneDesc {
        &self.desc
    }

    /// Play one tone at the default peak gain
    pub fn play_tone(&self, frequency: f32, duration: f32, waveform: Waveform) {
        self.play(Tone::new(frequency, duration, waveform));
    }

    /// Play one tone now
    pub fn play(&self, tone: Tone) {
        self.play_after(tone, Duration::ZERO);
    }

    /// Play one tone `delay` from now
    pub fn play_after(&self, tone: Tone, delay: Duration) {
        if !self.is_enabled() {
            return;
        }
        if let Err(e) = tone.validate() {
            log::debug!("Dropping tone: {}", e);
            return;
        }
        self.init_context().submit_tone(CueStep { offset: delay, tone });
    }

    pub fn play_cue(&self, cue: Cue) {
        if !self.is_enabled() {
            return;
        }
        log::debug!("Playing {} cue", cue);
        self.init_context().submit_cue(cue);
    }

    pub fn play_click_sound(&self) {
        self.play_cue(Cue::Click);
    }

    pub fn play_hover_sound(&self) {
        self.play_cue(Cue::Hover);
    }

    pub fn play_load_sound(&self) {
        self.play_cue(Cue::Load);
    }

    pub fn play_nav_sound(&self) {
        self.play_cue(Cue::Navigate);
    }

    pub fn play_button_sound(&self) {
        self.play_cue(Cue::Button);
    }

    pub fn play_success_sound(&self) {
        self.play_cue(Cue::Success);
    }

    pub fn play_whoosh_sound(&self) {
        self.play_cue(Cue::Whoosh);
    }

    /// Drop every scheduled tone that has not started yet. Tones already
    /// sounding play out.
    pub fn cancel_pending(&self) {
        if let Some(context) = self.context.get() {
            context.cancel_pending();
        }
    }
}
