use anyhow::{Context, Result};
use cuetone::{Cue, CueToneDesc, CueToneEngine, OfflineBackend, SoundToggle};
use std::time::Duration;

const OFFLINE_SAMPLE_RATE: u32 = 48000;

/// Play the named cues (all of them when `names` is empty), either on the
/// default device or rendered offline.
pub fn run(names: &[&str], offline: bool) -> Result<()> {
    let cues = if names.is_empty() {
        Cue::ALL.to_vec()
    } else {
        names
            .iter()
            .map(|name| name.parse::<Cue>().with_context(|| format!("parsing '{}'", name)))
            .collect::<Result<Vec<_>>>()?
    };

    if offline {
        render_offline(&cues)
    } else {
        play_live(&cues)
    }
}

fn play_live(cues: &[Cue]) -> Result<()> {
    let engine = CueToneEngine::new(CueToneDesc::default(), SoundToggle::default())
        .context("creating engine")?;

    let context = engine.init_context();
    if context.is_silent() {
        log::warn!("No audio output, cues will be silent");
    } else {
        log::info!(
            "Playing through {} at {}Hz",
            context.id(),
            context.sample_rate().unwrap_or(0)
        );
    }

    for cue in cues {
        log::info!("Playing {} ({} tones)", cue, cue.steps().len());
        engine.play_cue(*cue);
        std::thread::sleep(cue.total_duration() + Duration::from_millis(300));
    }

    log::info!("Muting and playing click, expect silence");
    engine.toggle().set_enabled(false);
    engine.play_click_sound();
    std::thread::sleep(Duration::from_millis(300));

    Ok(())
}

fn render_offline(cues: &[Cue]) -> Result<()> {
    let backend = OfflineBackend::new(OFFLINE_SAMPLE_RATE, 1);
    let engine = CueToneEngine::with_backend(
        CueToneDesc::default().sample_rate(OFFLINE_SAMPLE_RATE),
        SoundToggle::default(),
        backend.clone(),
    )
    .context("creating offline engine")?;

    for cue in cues {
        engine.play_cue(*cue);
        let samples = backend.render_for(cue.total_duration() + Duration::from_millis(20));

        let peak = samples.iter().fold(0.0f32, |max, s| max.max(s.abs()));
        let rms = (samples.iter().map(|s| s * s).sum::<f32>() / samples.len().max(1) as f32).sqrt();
        let audible = samples.iter().filter(|s| s.abs() > 1e-4).count();

        log::info!(
            "{:>8}: {} frames, peak {:.3}, rms {:.4}, audible for {:.1}ms",
            cue.name(),
            samples.len(),
            peak,
            rms,
            audible as f64 * 1000.0 / OFFLINE_SAMPLE_RATE as f64
        );
    }

    Ok(())
}
