//! NeuroVX CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use neurovx_cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess(args) => neurovx_cli::assess::execute(&args)?,
        Commands::Simulate(args) => neurovx_cli::simulate::execute(&args)?,
        Commands::Replay(args) => neurovx_cli::replay::execute(&args)?,
        Commands::Version => {
            println!("neurovx {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
