//! `neurovx assess`: stratify a metrics file into per-domain risk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use neurovx_risk::{RiskInputs, RiskStratifier, RiskThresholds};

use crate::output::{print_assessment, OutputFormat};

/// Arguments for the assess command
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Latest metrics of every feature provider (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Threshold overrides (JSON); missing fields keep their defaults
    #[arg(short, long)]
    pub thresholds: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Build the stratifier, loading thresholds if a file was given.
pub fn stratifier(thresholds: Option<&std::path::Path>) -> Result<RiskStratifier> {
    let thresholds = match thresholds {
        Some(p) => RiskThresholds::from_json(p)
            .with_context(|| format!("Failed to load thresholds {}", p.display()))?,
        None => RiskThresholds::default(),
    };
    RiskStratifier::new(thresholds).context("Invalid thresholds")
}

/// Execute the assess command
pub fn execute(args: &AssessArgs) -> Result<()> {
    let stratifier = stratifier(args.thresholds.as_deref())?;
    let inputs = RiskInputs::from_json(&args.input)
        .with_context(|| format!("Failed to load metrics {}", args.input.display()))?;

    let assessment = stratifier.stratify_inputs(&inputs);
    info!(
        confidence = assessment.confidence,
        modules = assessment.available_modules,
        "assessment complete"
    );
    print_assessment(&assessment, args.format)
}
