use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use plmlink_core::ConnectorConfig;

mod commands;

#[derive(Parser)]
#[command(name = "plmlink")]
#[command(author, version, about = "CLI for polling TruePLM sensor data", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the connector configuration file
    #[arg(short, long, global = true, default_value = "plmlink.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sensors discovered under the configured model
    Sensors {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Poll the configured signal and emit raw event batches
    Poll {
        /// Write batches to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many batches (0 for unlimited)
        #[arg(short, long, default_value = "0")]
        limit: u64,
    },

    /// Fetch one sample batch for schema inspection
    Preview,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so that polled batches on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ConnectorConfig::load_validated(&cli.config)?;

    match cli.command {
        Commands::Sensors { format } => commands::sensors::run(config, &format).await,
        Commands::Poll { output, limit } => commands::poll::run(config, output, limit).await,
        Commands::Preview => commands::preview::run(config).await,
    }
}
