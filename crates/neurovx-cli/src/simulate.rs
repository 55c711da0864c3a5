//! `neurovx simulate`: run the pipeline on a synthetic skin colour stream.

use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use neurovx_vitals::ColorSample;

use crate::output::{print_vitals_report, OutputFormat};
use crate::session;

/// Illumination flicker frequency used when `--motion` is non-zero.
const FLICKER_HZ: f64 = 0.3;

/// Longest stream `simulate` will synthesize (about 9 h at 30 fps).
pub const MAX_SAMPLES: usize = 1_000_000;

/// Arguments for the simulate command
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Simulated heart rate (beats per minute)
    #[arg(long, default_value = "72")]
    pub heart_rate: f64,

    /// Simulated breathing rate (breaths per minute)
    #[arg(long, default_value = "15")]
    pub breathing_rate: f64,

    /// Stream duration in seconds
    #[arg(short, long, default_value = "30")]
    pub duration: f64,

    /// Frame rate in Hz
    #[arg(long, default_value = "30")]
    pub fps: f64,

    /// Relative amplitude of a common-mode illumination flicker
    #[arg(short, long, default_value = "0")]
    pub motion: f64,

    /// Pipeline configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Deterministic forehead colour trace.
///
/// The pulse modulates all three channels with green strongest, breathing
/// modulates green only, and the flicker scales every channel together.
/// The stream is truncated to [`MAX_SAMPLES`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn synthesize(
    heart_rate: f64,
    breathing_rate: f64,
    duration: f64,
    fps: f64,
    motion: f64,
) -> Vec<ColorSample> {
    let n = ((duration * fps).floor().max(0.0) as usize).min(MAX_SAMPLES);
    let fh = heart_rate / 60.0;
    let fr = breathing_rate / 60.0;
    (0..n)
        .map(|i| {
            let t = i as f64 / fps;
            let pulse = (2.0 * PI * fh * t).sin();
            let breath = (2.0 * PI * fr * t).sin();
            let light = 1.0 + motion * (2.0 * PI * FLICKER_HZ * t).sin();
            ColorSample::new(
                (150.0 + 0.4 * pulse) * light,
                (100.0 + 0.8 * pulse + 2.0 * breath) * light,
                (80.0 + 0.2 * pulse) * light,
                t,
            )
        })
        .collect()
}

/// Execute the simulate command
#[allow(clippy::cast_precision_loss)]
pub fn execute(args: &SimulateArgs) -> Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be positive, got {}", args.fps);
    }
    if !(args.duration.is_finite() && args.duration > 0.0) {
        bail!("--duration must be positive, got {}", args.duration);
    }
    if !(0.0..1.0).contains(&args.motion) {
        bail!("--motion must be in [0, 1), got {}", args.motion);
    }
    if args.duration * args.fps > MAX_SAMPLES as f64 {
        bail!(
            "--duration {} s at {} fps exceeds {MAX_SAMPLES} samples",
            args.duration,
            args.fps
        );
    }

    let config = session::load_config(args.config.as_deref())?;
    info!(
        heart_rate = args.heart_rate,
        breathing_rate = args.breathing_rate,
        duration = args.duration,
        fps = args.fps,
        "simulating stream"
    );

    let samples = synthesize(
        args.heart_rate,
        args.breathing_rate,
        args.duration,
        args.fps,
        args.motion,
    );
    let report = session::run(config, samples)?;
    print_vitals_report("Simulated rPPG Session", &report, args.format)
}
