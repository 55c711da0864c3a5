//! Output formats and rendering shared by the commands.

use anyhow::Result;
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use tabled::{settings::Style, Table, Tabled};

use neurovx_risk::{Domain, RiskAssessment, RiskLevel};

use crate::session::VitalsReport;

/// Output format for command results
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Compact single-line format
    Compact,
}

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Risk")]
    level: String,
    #[tabled(rename = "Reasons")]
    reasons: String,
}

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "t (s)")]
    time: String,
    #[tabled(rename = "Heart Rate")]
    bpm: String,
    #[tabled(rename = "HRV SDNN")]
    hrv: String,
    #[tabled(rename = "Resp. Rate")]
    rr: String,
}

fn paint(level: RiskLevel) -> ColoredString {
    let label = level.as_str().to_uppercase();
    match level {
        RiskLevel::Low => label.green().bold(),
        RiskLevel::Medium => label.yellow().bold(),
        RiskLevel::High => label.red().bold(),
        RiskLevel::Uncertain => label.dimmed(),
    }
}

fn metric(value: f64, unit: &str) -> String {
    if value > 0.0 {
        format!("{value:.1} {unit}")
    } else {
        "-".to_string()
    }
}

fn domain_rows(assessment: &RiskAssessment, domains: &[Domain]) -> Vec<DomainRow> {
    domains
        .iter()
        .map(|&d| {
            let reasons = assessment.reasons(d);
            DomainRow {
                domain: d.label().to_string(),
                level: assessment.level(d).as_str().to_string(),
                reasons: if reasons.is_empty() {
                    "-".to_string()
                } else {
                    reasons.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
                },
            }
        })
        .collect()
}

/// One-line `key=value` summary of an assessment.
pub fn compact_assessment(assessment: &RiskAssessment) -> String {
    let mut parts: Vec<String> = assessment
        .risk_signals
        .iter()
        .map(|(d, l)| format!("{}={}", d.key(), l))
        .collect();
    parts.push(format!("confidence={:.2}", assessment.confidence));
    if !assessment.uncertainty_flags.is_empty() {
        let flags: Vec<&str> = assessment.uncertainty_flags.iter().map(|f| f.as_str()).collect();
        parts.push(format!("flags={}", flags.join(",")));
    }
    parts.join(" ")
}

/// Print a full multi-domain assessment.
pub fn print_assessment(assessment: &RiskAssessment, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(assessment)?);
        }
        OutputFormat::Compact => {
            println!("{}", compact_assessment(assessment));
        }
        OutputFormat::Table => {
            println!("{}", "Risk Stratification".bold().cyan());
            println!("{}", "=".repeat(50));
            println!();

            let table = Table::new(domain_rows(assessment, &Domain::ALL))
                .with(Style::rounded())
                .to_string();
            println!("{table}");
            println!();

            for domain in Domain::ALL {
                println!("  {:<22} {}", format!("{domain}:"), paint(assessment.level(domain)));
            }
            println!();
            println!(
                "  Confidence:       {:.2}  ({} of 4 modules available)",
                assessment.confidence, assessment.available_modules
            );
            if let Some(highest) = assessment.highest() {
                println!("  Highest level:    {}", paint(highest));
            }
            if !assessment.uncertainty_flags.is_empty() {
                println!("\n{}", "Uncertainty flags:".yellow());
                for flag in &assessment.uncertainty_flags {
                    println!("  - {}", flag.as_str().dimmed());
                }
            }
        }
    }
    Ok(())
}

/// Print the outcome of a pipeline session.
pub fn print_vitals_report(title: &str, report: &VitalsReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Compact => {
            println!(
                "samples={} recomputes={} bpm={:.1} hrv_sdnn={:.1} rr={:.1} {}",
                report.samples,
                report.recomputes,
                report.vitals.bpm,
                report.vitals.hrv_sdnn,
                report.vitals.rr,
                compact_assessment(&report.assessment),
            );
        }
        OutputFormat::Table => {
            println!("{}", title.bold().cyan());
            println!("{}", "=".repeat(50));
            println!();
            println!("  Samples:          {}", report.samples);
            println!("  Dropped:          {}", report.dropped);
            println!("  Recomputes:       {}", report.recomputes);
            println!("  Sampling rate:    {:.2} Hz", report.sampling_rate_hz);
            println!();

            if report.timeline.is_empty() {
                println!("{}", "Window never filled; no estimate produced.".yellow());
            } else {
                let rows: Vec<SnapshotRow> = report
                    .timeline
                    .iter()
                    .map(|s| SnapshotRow {
                        time: format!("{:.2}", s.time),
                        bpm: metric(s.vitals.bpm, "bpm"),
                        hrv: metric(s.vitals.hrv_sdnn, "ms"),
                        rr: metric(s.vitals.rr, "/min"),
                    })
                    .collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
            println!();

            println!("{}", "Smoothed vitals".bold());
            println!("  Heart rate:       {}", metric(report.vitals.bpm, "bpm"));
            println!("  HRV (SDNN):       {}", metric(report.vitals.hrv_sdnn, "ms"));
            println!("  Respiratory rate: {}", metric(report.vitals.rr, "breaths/min"));
            println!();

            let domains = [Domain::Cardiovascular, Domain::Respiratory];
            let table = Table::new(domain_rows(&report.assessment, &domains))
                .with(Style::rounded())
                .to_string();
            println!("{table}");
        }
    }
    Ok(())
}
