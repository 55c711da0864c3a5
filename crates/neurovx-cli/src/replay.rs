//! `neurovx replay`: run the pipeline on recorded ROI colour samples.
//!
//! The input holds one JSON object per line:
//!
//! ```text
//! {"r": 151.2, "g": 100.4, "b": 80.1, "timestamp": 0.0}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use neurovx_vitals::ColorSample;

use crate::output::{print_vitals_report, OutputFormat};
use crate::session;

/// Arguments for the replay command
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Recorded samples (JSON lines)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Pipeline configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Parse JSON-lines samples. Blank lines and `#` comments are skipped.
pub fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<ColorSample>> {
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample: ColorSample = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid sample on line {}", idx + 1))?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Execute the replay command
pub fn execute(args: &ReplayArgs) -> Result<()> {
    let config = session::load_config(args.config.as_deref())?;
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let samples = parse_samples(BufReader::new(file))?;
    info!(path = %args.input.display(), samples = samples.len(), "replaying recording");

    let report = session::run(config, samples)?;
    print_vitals_report("rPPG Replay", &report, args.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_and_skips_comments() {
        let text = "# recorded at 30 fps\n\
                    {\"r\": 150.0, \"g\": 100.0, \"b\": 80.0, \"timestamp\": 0.0}\n\
                    \n\
                    {\"r\": 151.0, \"g\": 101.0, \"b\": 81.0, \"timestamp\": 0.033}\n";
        let samples = parse_samples(text.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert!((samples[1].g - 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reports_offending_line() {
        let text = "{\"r\": 150.0, \"g\": 100.0, \"b\": 80.0, \"timestamp\": 0.0}\nnot json\n";
        let err = parse_samples(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }
}
