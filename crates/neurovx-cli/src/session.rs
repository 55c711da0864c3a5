//! Drive an [`RppgPipeline`] over a sample stream and summarise the run.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use neurovx_risk::{RiskAssessment, RiskInputs, RiskStratifier};
use neurovx_vitals::{ColorSample, PipelineConfig, RppgPipeline, VitalMetrics};

/// Smoothed vitals right after a successful recompute.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot {
    /// Timestamp of the sample that triggered the recompute, seconds.
    pub time: f64,
    /// Smoothed metrics at that point.
    pub vitals: VitalMetrics,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct VitalsReport {
    pub samples: usize,
    pub dropped: usize,
    pub recomputes: u64,
    pub sampling_rate_hz: f64,
    pub vitals: VitalMetrics,
    pub timeline: Vec<Snapshot>,
    /// Stratification of the camera-derived domains only.
    pub assessment: RiskAssessment,
}

/// Pipeline configuration from `path`, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::from_json(p)
            .with_context(|| format!("Failed to load pipeline config {}", p.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Feed every sample through a fresh pipeline.
pub fn run<I>(config: PipelineConfig, samples: I) -> Result<VitalsReport>
where
    I: IntoIterator<Item = ColorSample>,
{
    let mut pipeline = RppgPipeline::new(config).context("Invalid pipeline configuration")?;
    let mut timeline = Vec::new();
    let mut total = 0_usize;
    let mut dropped = 0_usize;

    for sample in samples {
        total += 1;
        let outcome = pipeline.push_sample(sample);
        if !outcome.sampled {
            dropped += 1;
        }
        if outcome.recomputed {
            timeline.push(Snapshot {
                time: sample.timestamp,
                vitals: outcome.vitals,
            });
        }
    }

    let vitals = pipeline.vitals();
    let inputs = RiskInputs {
        rppg: vitals.into(),
        ..RiskInputs::default()
    };
    let assessment = RiskStratifier::default().stratify_inputs(&inputs);

    info!(
        samples = total,
        dropped,
        recomputes = pipeline.recomputes(),
        bpm = vitals.bpm,
        rr = vitals.rr,
        "session finished"
    );

    Ok(VitalsReport {
        samples: total,
        dropped,
        recomputes: pipeline.recomputes(),
        sampling_rate_hz: pipeline.window().sampling_rate(),
        vitals,
        timeline,
        assessment,
    })
}
