//! The audio output context an engine plays through.

use crate::backend::{AudioBackend, OutputStream};
use crate::config::CueToneDesc;
use crate::cue::{Cue, CueStep};
use crate::mixer::Renderer;
use crate::playback::RenderCommand;
use crossbeam_channel::{Sender, TrySendError};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one audio context for the lifetime of the process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

/// Shared output resource of an engine.
///
/// A context is either live (an open output fed through a command channel)
/// or silent (the host had no usable output). A silent context accepts every
/// request and drops it.
pub struct AudioContext {
    id: ContextId,
    commands: Option<Sender<RenderCommand>>,
    clock: Arc<AtomicU64>,
    output: Option<Box<dyn OutputStream>>,
}

impl AudioContext {
    /// Open an output on `backend`, falling back to a silent context when the
    /// backend cannot provide one.
    pub(crate) fn open(desc: &CueToneDesc, backend: &dyn AudioBackend) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(desc.command_capacity);
        let clock = Arc::new(AtomicU64::new(0));
        let renderer = Renderer::new(desc, receiver, clock.clone());

        match backend.open(desc, renderer) {
            Ok(output) => {
                let context = Self {
                    id: next_id(),
                    commands: Some(sender),
                    clock,
                    output: Some(output),
                };
                log::info!(
                    "{} ready: {}ch at {}Hz",
                    context.id,
                    context.channels().unwrap_or(0),
                    context.sample_rate().unwrap_or(0)
                );
                context
            }
            Err(e) => {
                log::warn!("Audio output unavailable, cues will be silent: {}", e);
                Self::silent()
            }
        }
    }

    /// A context with no output. Every request is dropped.
    pub fn silent() -> Self {
        Self {
            id: next_id(),
            commands: None,
            clock: Arc::new(AtomicU64::new(0)),
            output: None,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn is_silent(&self) -> bool {
        self.commands.is_none()
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.output.as_ref().map(|output| output.sample_rate())
    }

    pub fn channels(&self) -> Option<u16> {
        self.output.as_ref().map(|output| output.channels())
    }

    /// Output frames rendered since the context opened
    pub fn current_frame(&self) -> u64 {
        self.clock.load(Ordering::Relaxed)
    }

    /// Hand a cue to the renderer. Never blocks; a full or closed channel
    /// drops the request.
    pub(crate) fn submit_cue(&self, cue: Cue) {
        self.send(RenderCommand::Cue(cue));
    }

    pub(crate) fn submit_tone(&self, step: CueStep) {
        self.send(RenderCommand::Tone(step));
    }

    pub(crate) fn cancel_pending(&self) {
        self.send(RenderCommand::CancelPending);
    }

    fn send(&self, command: RenderCommand) {
        let Some(commands) = &self.commands else {
            return;
        };

        match commands.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(command)) => {
                log::debug!("{}: command queue full, dropping {:?}", self.id, command);
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("{}: renderer gone, dropping command", self.id);
            }
        }
    }
}

impl fmt::Debug for AudioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioContext")
            .field("id", &self.id)
            .field("silent", &self.is_silent())
            .field("sample_rate", &self.sample_rate())
            .field("channels", &self.channels())
            .finish()
    }
}

impl Drop for AudioContext {
    fn drop(&mut self) {
        log::debug!("{} released", self.id);
    }
}

fn next_id() -> ContextId {
    ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
}
