//! Development tasks for the battle engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;

use anyhow::Result;
use clap::Parser;
use commands::{CheckContent, Simulate};

/// Development tasks for the battle engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the battle engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a battle headlessly and print its log and report
    Simulate(Simulate),

    /// Load and cross-check every content file
    CheckContent(CheckContent),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for BATTLE_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute().await,
        Command::CheckContent(cmd) => cmd.execute(),
    }
}
