//! NeuroVX command line interface.
//!
//! # Commands
//!
//! - **assess**: stratify a metrics file into per-domain risk levels
//! - **simulate**: run the rPPG pipeline on a synthetic colour stream
//! - **replay**: run the rPPG pipeline on recorded colour samples
//! - **version**: display version information
//!
//! # Usage
//!
//! ```bash
//! # Assess the latest metrics of every feature provider
//! neurovx assess --input metrics.json
//!
//! # Synthetic 72 BPM / 15 breaths-per-minute stream with flicker
//! neurovx simulate --heart-rate 72 --breathing-rate 15 --motion 0.02
//!
//! # Replay recorded ROI samples (one JSON object per line)
//! neurovx replay --input samples.jsonl --format compact
//! ```

use clap::{Parser, Subcommand};

pub mod assess;
pub mod output;
pub mod replay;
pub mod session;
pub mod simulate;

/// NeuroVX Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "neurovx")]
#[command(author, version, about = "Camera vital signs and multi-domain risk screening")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stratify risk from a metrics file
    Assess(assess::AssessArgs),

    /// Run the vitals pipeline on a synthetic stream
    Simulate(simulate::SimulateArgs),

    /// Run the vitals pipeline on recorded samples
    Replay(replay::ReplayArgs),

    /// Display version information
    Version,
}
