//! Named UI cues and their fixed tone sequences.

use crate::engine::CueToneEngine;
use crate::error::CueToneError;
use crate::tone::{Tone, Waveform};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Peak gain of the whoosh cue, quieter than every other cue.
pub const WHOOSH_PEAK_GAIN: f32 = 0.08;

/// One tone of a cue and when it starts relative to the cue trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueStep {
    pub offset: Duration,
    pub tone: Tone,
}

impl CueStep {
    const fn at(offset_ms: u64, tone: Tone) -> Self {
        Self {
            offset: Duration::from_millis(offset_ms),
            tone,
        }
    }
}

const CLICK: [CueStep; 1] = [CueStep::at(0, Tone::new(1200.0, 0.1, Waveform::Square))];

const HOVER: [CueStep; 1] = [CueStep::at(0, Tone::new(600.0, 0.05, Waveform::Sine))];

// C major pentatonic, C5 to A5
const LOAD: [CueStep; 5] = [
    CueStep::at(0, Tone::new(523.0, 0.4, Waveform::Sine)),
    CueStep::at(200, Tone::new(587.0, 0.4, Waveform::Sine)),
    CueStep::at(400, Tone::new(659.0, 0.4, Waveform::Sine)),
    CueStep::at(600, Tone::new(784.0, 0.4, Waveform::Sine)),
    CueStep::at(800, Tone::new(880.0, 0.4, Waveform::Sine)),
];

const NAVIGATE: [CueStep; 1] = [CueStep::at(0, Tone::new(800.0, 0.08, Waveform::Sine))];

const BUTTON: [CueStep; 1] = [CueStep::at(0, Tone::new(1000.0, 0.12, Waveform::Triangle))];

const SUCCESS: [CueStep; 3] = [
    CueStep::at(0, Tone::new(523.0, 0.15, Waveform::Sine)),
    CueStep::at(80, Tone::new(659.0, 0.15, Waveform::Sine)),
    CueStep::at(160, Tone::new(784.0, 0.15, Waveform::Sine)),
];

const WHOOSH: [CueStep; 1] = [CueStep::at(
    0,
    Tone::new(300.0, 0.12, Waveform::Sine).with_peak_gain(WHOOSH_PEAK_GAIN),
)];

/// A named, parameter-less sound gesture triggered by a UI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Project card click
    Click,
    /// Pointer entering an interactive element
    Hover,
    /// A page section scrolling into view for the first time
    Load,
    /// Navigation link
    Navigate,
    /// Generic button press
    Button,
    /// Form submitted
    Success,
    /// Carousel rotation tick
    Whoosh,
}

impl Cue {
    pub const ALL: [Cue; 7] = [
        Cue::Click,
        Cue::Hover,
        Cue::Load,
        Cue::Navigate,
        Cue::Button,
        Cue::Success,
        Cue::Whoosh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Load => "load",
            Self::Navigate => "navigate",
            Self::Button => "button",
            Self::Success => "success",
            Self::Whoosh => "whoosh",
        }
    }

    /// The tones of this cue, ordered by start offset.
    pub fn steps(self) -> &'static [CueStep] {
        match self {
            Self::Click => &CLICK,
            Self::Hover => &HOVER,
            Self::Load => &LOAD,
            Self::Navigate => &NAVIGATE,
            Self::Button => &BUTTON,
            Self::Success => &SUCCESS,
            Self::Whoosh => &WHOOSH,
        }
    }

    /// Most tones any single cue schedules
    pub fn max_steps() -> usize {
        Self::ALL
            .iter()
            .map(|cue| cue.steps().len())
            .max()
            .unwrap_or(0)
    }

    /// Time from trigger until the last tone has stopped.
    pub fn total_duration(self) -> Duration {
        self.steps()
            .iter()
            .map(|step| step.offset + step.tone.length())
            .max()
            .unwrap_or_default()
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cue {
    type Err = CueToneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "click" => Ok(Self::Click),
            "hover" => Ok(Self::Hover),
            "load" => Ok(Self::Load),
            "navigate" | "nav" => Ok(Self::Navigate),
            "button" => Ok(Self::Button),
            "success" => Ok(Self::Success),
            "whoosh" => Ok(Self::Whoosh),
            other => Err(CueToneError::Configuration(format!(
                "unknown cue '{}'",
                other
            ))),
        }
    }
}

/// Plays a cue the first time it is fired and ignores every later call.
///
/// Sections use this so their load melody plays once when they first scroll
/// into view, not on every re-entry.
#[derive(Debug, Default)]
pub struct OneShot {
    fired: AtomicBool,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this call played the cue.
    ///
    /// A call made while sound is disabled still consumes the shot.
    pub fn fire(&self, engine: &CueToneEngine, cue: Cue) -> bool {
        if self.fired.swap(true, Ordering::Relaxed) {
            return false;
        }
        engine.play_cue(cue);
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.fired.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(cue: Cue) -> Vec<(u64, f32, f32, Waveform)> {
        cue.steps()
            .iter()
            .map(|s| {
                (
                    s.offset.as_millis() as u64,
                    s.tone.frequency,
                    s.tone.duration,
                    s.tone.waveform,
                )
            })
            .collect()
    }

    #[test]
    fn single_tone_cues() {
        assert_eq!(summary(Cue::Click), vec![(0, 1200.0, 0.1, Waveform::Square)]);
        assert_eq!(summary(Cue::Hover), vec![(0, 600.0, 0.05, Waveform::Sine)]);
        assert_eq!(summary(Cue::Navigate), vec![(0, 800.0, 0.08, Waveform::Sine)]);
        assert_eq!(
            summary(Cue::Button),
            vec![(0, 1000.0, 0.12, Waveform::Triangle)]
        );
        assert_eq!(summary(Cue::Whoosh), vec![(0, 300.0, 0.12, Waveform::Sine)]);
    }

    #[test]
    fn load_is_a_pentatonic_run() {
        assert_eq!(
            summary(Cue::Load),
            vec![
                (0, 523.0, 0.4, Waveform::Sine),
                (200, 587.0, 0.4, Waveform::Sine),
                (400, 659.0, 0.4, Waveform::Sine),
                (600, 784.0, 0.4, Waveform::Sine),
                (800, 880.0, 0.4, Waveform::Sine),
            ]
        );
    }

    #[test]
    fn success_is_a_quick_arpeggio() {
        assert_eq!(
            summary(Cue::Success),
            vec![
                (0, 523.0, 0.15, Waveform::Sine),
                (80, 659.0, 0.15, Waveform::Sine),
                (160, 784.0, 0.15, Waveform::Sine),
            ]
        );
    }

    #[test]
    fn only_whoosh_overrides_peak_gain() {
        for cue in Cue::ALL {
            for step in cue.steps() {
                if cue == Cue::Whoosh {
                    assert_eq!(step.tone.peak_gain, Some(0.08));
                } else {
                    assert_eq!(step.tone.peak_gain, None, "{}", cue);
                }
            }
        }
    }

    #[test]
    fn every_step_is_a_valid_tone() {
        for cue in Cue::ALL {
            for step in cue.steps() {
                assert!(step.tone.validate().is_ok(), "{}: {}", cue, step.tone);
            }
        }
    }

    #[test]
    fn load_is_the_longest_cue() {
        assert_eq!(Cue::max_steps(), Cue::Load.steps().len());
        assert_eq!(Cue::max_steps(), 5);
    }

    #[test]
    fn total_duration_covers_last_tone() {
        for (cue, expected_ms) in [(Cue::Load, 1200), (Cue::Success, 310), (Cue::Hover, 50)] {
            let total = cue.total_duration().as_secs_f64() * 1000.0;
            assert!(
                (total - expected_ms as f64).abs() < 0.01,
                "{}: {}ms",
                cue,
                total
            );
        }
    }

    #[test]
    fn parses_names() {
        for cue in Cue::ALL {
            assert_eq!(cue.name().parse::<Cue>().unwrap(), cue);
        }
        assert_eq!("NAV".parse::<Cue>().unwrap(), Cue::Navigate);
        assert!("boom".parse::<Cue>().is_err());
    }
}
