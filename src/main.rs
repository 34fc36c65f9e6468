//! Command-line interface for stressity
//!
//! # Usage Examples
//!
//! ```bash
//! # Check config.json and schemas.json without sending anything
//! stressity validate --config config.json --schemas schemas.json
//!
//! # Run every enabled feature; Ctrl-C stops production and drains in-flight batches
//! RUST_LOG=info stressity run --config config.json --schemas schemas.json
//!
//! # Same, writing a JSON summary at the end
//! stressity run --report report.json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stressity::{run_load_test, validate_config, write_report, ConfigPaths};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "stressity")]
#[command(about = "Declarative load generator for HTTP APIs and Kafka topics")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled feature against its targets
    Run {
        #[command(flatten)]
        paths: ConfigPaths,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Load and validate configuration without contacting any target
    Validate {
        #[command(flatten)]
        paths: ConfigPaths,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { paths, report } => {
            let config = paths.load()?;

            let cancel = CancellationToken::new();
            let signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Shutdown requested, draining in-flight batches");
                    signal.cancel();
                }
            });

            let summary = run_load_test(&config, cancel).await?;
            tracing::info!(
                features = summary.features.len(),
                units = summary.total_units(),
                failed_items = summary.total_failed(),
                completed = summary.all_completed(),
                "Done"
            );

            if let Some(path) = report {
                write_report(&path, &summary)?;
            }
        }
        Commands::Validate { paths } => {
            let config = paths.load()?;
            let enabled = validate_config(&config)?;
            tracing::info!("Configuration is valid ({enabled} enabled features)");
        }
    }

    Ok(())
}
