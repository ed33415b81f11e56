//! Audio output backends.
//!
//! A backend turns a [`Renderer`] into sound. [`CpalBackend`] drives it from
//! the default output device, [`NullBackend`] stands in for a host without
//! audio output, and [`OfflineBackend`] keeps the renderer so its owner can
//! pull samples by hand.

use crate::config::CueToneDesc;
use crate::error::{CueToneError, Result};
use crate::mixer::Renderer;
use crate::scheduler::ScheduledTone;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A running output. Dropping it stops the output.
pub trait OutputStream {
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
}

/// Something that can open an output driven by a [`Renderer`].
pub trait AudioBackend {
    fn open(&self, desc: &CueToneDesc, renderer: Renderer) -> Result<Box<dyn OutputStream>>;
}

/// Output through the default device of the default cpal host.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

struct CpalOutput {
    _stream: cpal::Stream,
    sample_rate: u32,
    channels: u16,
}

impl OutputStream for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }
}

impl AudioBackend for CpalBackend {
    fn open(&self, desc: &CueToneDesc, renderer: Renderer) -> Result<Box<dyn OutputStream>> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            CueToneError::AudioDevice("No default output device available".into())
        })?;

        let default_config = device.default_output_config().map_err(|e| {
            CueToneError::AudioDevice(format!("Failed to get default config: {}", e))
        })?;

        let config = select_stream_config(&device, &default_config, desc);
        log::debug!(
            "Opening output on {:?}: {}ch, {}Hz, {:?}",
            device.name().unwrap_or_else(|_| "Unknown Device".to_string()),
            config.channels,
            config.sample_rate.0,
            default_config.sample_format()
        );

        let stream = match default_config.sample_format() {
            cpal::SampleFormat::F32 => create_stream::<f32>(&device, &config, renderer)?,
            cpal::SampleFormat::I16 => create_stream::<i16>(&device, &config, renderer)?,
            cpal::SampleFormat::U16 => create_stream::<u16>(&device, &config, renderer)?,
            other => {
                return Err(CueToneError::AudioFormat(format!(
                    "Unsupported sample format {:?}",
                    other
                )));
            }
        };

        stream
            .play()
            .map_err(|e| CueToneError::Stream(format!("Failed to start stream: {}", e)))?;

        Ok(Box::new(CpalOutput {
            _stream: stream,
            sample_rate: config.sample_rate.0,
            channels: config.channels,
        }))
    }
}

/// Use the requested rate and channel count when the device supports them,
/// the device defaults otherwise.
fn select_stream_config(
    device: &cpal::Device,
    default_config: &cpal::SupportedStreamConfig,
    desc: &CueToneDesc,
) -> cpal::StreamConfig {
    let fallback = default_config.config();
    if desc.sample_rate.is_none() && desc.channels.is_none() {
        return fallback;
    }

    let channels = desc.channels.unwrap_or(fallback.channels);
    let sample_rate = cpal::SampleRate(desc.sample_rate.unwrap_or(fallback.sample_rate.0));

    let supported = device
        .supported_output_configs()
        .map(|mut configs| {
            configs.any(|config| {
                config.channels() == channels
                    && config.sample_format() == default_config.sample_format()
                    && config.min_sample_rate() <= sample_rate
                    && config.max_sample_rate() >= sample_rate
            })
        })
        .unwrap_or(false);

    if supported {
        cpal::StreamConfig {
            channels,
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        }
    } else {
        log::debug!(
            "{}ch at {}Hz not supported, using device default {}ch at {}Hz",
            channels,
            sample_rate.0,
            fallback.channels,
            fallback.sample_rate.0
        );
        fallback
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut renderer: Renderer,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0;
    let channels = config.channels;
    let mut mix_buffer: Vec<f32> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if mix_buffer.len() != data.len() {
                    mix_buffer.resize(data.len(), 0.0);
                }

                renderer.render(&mut mix_buffer, sample_rate, channels);

                for (sample, mixed) in data.iter_mut().zip(mix_buffer.iter()) {
                    *sample = T::from_sample(mixed.clamp(-1.0, 1.0));
                }
            },
            move |err| {
                log::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| CueToneError::Stream(format!("Failed to build stream: {}", e)))
}

/// A host with no audio output. Every open fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn open(&self, _desc: &CueToneDesc, _renderer: Renderer) -> Result<Box<dyn OutputStream>> {
        Err(CueToneError::AudioDevice("No audio output available".into()))
    }
}

struct OfflineState {
    renderer: Option<Renderer>,
    open_count: usize,
}

/// Output rendered on demand instead of by a device clock.
///
/// Clones share the same state: hand one clone to the engine and keep
/// another to pull samples and inspect what is pending.
#[derive(Clone)]
pub struct OfflineBackend {
    state: Arc<Mutex<OfflineState>>,
    sample_rate: u32,
    channels: u16,
}

struct OfflineOutput {
    sample_rate: u32,
    channels: u16,
}

impl OutputStream for OfflineOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }
}

impl OfflineBackend {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            state: Arc::new(Mutex::new(OfflineState {
                renderer: None,
                open_count: 0,
            })),
            sample_rate,
            channels: channels.max(1),
        }
    }

    fn state(&self) -> MutexGuard<'_, OfflineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// How many times an output has been opened on this backend
    pub fn open_count(&self) -> usize {
        self.state().open_count
    }

    pub fn is_open(&self) -> bool {
        self.state().renderer.is_some()
    }

    /// Render `frames` frames of interleaved output. Silence if nothing has
    /// opened the backend yet.
    pub fn render_frames(&self, frames: usize) -> Vec<f32> {
        let mut buffer = vec![0.0f32; frames * self.channels as usize];
        if let Some(renderer) = self.state().renderer.as_mut() {
            renderer.render(&mut buffer, self.sample_rate, self.channels);
        }
        buffer
    }

    pub fn render_for(&self, duration: Duration) -> Vec<f32> {
        let frames = (duration.as_secs_f64() * self.sample_rate as f64).round() as usize;
        self.render_frames(frames)
    }

    /// Apply queued commands without advancing the clock.
    pub fn sync(&self) {
        if let Some(renderer) = self.state().renderer.as_mut() {
            renderer.sync(self.sample_rate);
        }
    }

    /// Pending tones after a [`sync`](Self::sync), ordered by due frame
    pub fn scheduled(&self) -> Vec<ScheduledTone> {
        self.state()
            .renderer
            .as_ref()
            .map(|renderer| renderer.scheduled().copied().collect())
            .unwrap_or_default()
    }

    pub fn active_voices(&self) -> usize {
        self.state()
            .renderer
            .as_ref()
            .map(Renderer::active_voices)
            .unwrap_or(0)
    }

    pub fn current_frame(&self) -> u64 {
        self.state()
            .renderer
            .as_ref()
            .map(Renderer::current_frame)
            .unwrap_or(0)
    }
}

impl AudioBackend for OfflineBackend {
    fn open(&self, _desc: &CueToneDesc, renderer: Renderer) -> Result<Box<dyn OutputStream>> {
        if self.sample_rate == 0 {
            return Err(CueToneError::Configuration(
                "offline sample rate must be non-zero".into(),
            ));
        }

        let mut state = self.state();
        state.renderer = Some(renderer);
        state.open_count += 1;

        Ok(Box::new(OfflineOutput {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }))
    }
}
