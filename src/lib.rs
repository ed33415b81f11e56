//! # CueTone
//!
//! Procedural audio feedback for user interfaces. CueTone synthesizes short
//! tones and melodies on demand, with no audio assets, and exposes them as a
//! fixed set of named cues (click, hover, load, navigate, button, success,
//! whoosh) that UI event handlers call directly.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cuetone::*;
//!
//! // The application owns the on/off switch
//! let sound = SoundToggle::default();
//!
//! // The engine opens its output lazily, on the first audible cue
//! let engine = CueToneEngine::new(CueToneDesc::default(), sound.clone())?;
//!
//! // Call cues straight from event handlers; they return immediately
//! engine.play_hover_sound();
//! engine.play_load_sound();
//!
//! // Muting takes effect on the next call
//! sound.set_enabled(false);
//! engine.play_click_sound(); // silent, does nothing
//! # Ok::<(), CueToneError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`CueToneEngine`]**: cue functions, `play_tone`, lazy context creation
//! - **[`SoundToggle`]**: shared enabled flag read by every cue at call time
//! - **[`Cue`]**: the named cues and their tone tables
//! - **[`Tone`]** / **[`Waveform`]**: a single synthesis request
//! - **[`AudioBackend`]**: where the rendered signal goes ([`CpalBackend`],
//!   [`NullBackend`], [`OfflineBackend`])
//!
//! ## Architecture
//!
//! 1. **Caller thread**: cue calls check the toggle, then push a schedule
//!    command into a bounded channel without blocking
//! 2. **Audio callback**: the renderer drains commands, starts due tones at
//!    their exact frame, mixes every sounding voice
//!
//! The renderer's frame counter is the only clock: melody offsets are turned
//! into frame positions when the command is received, so tones of one cue
//! never drift relative to each other.
//!
//! A host without audio output never surfaces an error. The engine's context
//! is created in silent mode and every cue becomes a no-op.

pub mod backend;
pub mod config;
pub mod context;
pub mod cue;
pub mod engine;
pub mod error;
pub mod mixer;
pub mod playback;
pub mod scheduler;
pub mod toggle;
pub mod tone;

pub use backend::{AudioBackend, CpalBackend, NullBackend, OfflineBackend, OutputStream};
pub use config::CueToneDesc;
pub use context::{AudioContext, ContextId};
pub use cue::{Cue, CueStep, OneShot};
pub use engine::{CueToneEngine, EngineState};
pub use error::CueToneError;
pub use toggle::SoundToggle;
pub use tone::{Envelope, Tone, Waveform};
