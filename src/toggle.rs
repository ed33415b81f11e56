//! Shared sound-enabled flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The application-owned switch that gates every cue.
///
/// Clones share the same flag, so the application keeps one handle for its
/// on/off control and hands clones to each engine it builds. Engines only
/// ever read it.
#[derive(Debug, Clone)]
pub struct SoundToggle {
    enabled: Arc<AtomicBool>,
}

impl Default for SoundToggle {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SoundToggle {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        log::debug!("Sound {}", if enabled { "enabled" } else { "disabled" });
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::Relaxed);
        log::debug!("Sound {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }
}
