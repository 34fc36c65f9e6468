//! Process-level steps: validate, open sinks, run, close.

use crate::config::LoadedConfig;
use anyhow::Context;
use loadtest_generator::{validate, GeneratorRegistry};
use loadtest_scheduler::{LoadTest, LoadTestReport};
use loadtest_sink::SinkSet;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Validate the configuration without touching any target.
///
/// Returns the number of enabled features.
pub fn validate_config(config: &LoadedConfig) -> anyhow::Result<usize> {
    let registry = GeneratorRegistry::new();
    let enabled = validate(&config.features, &config.targets, &registry)
        .context("Configuration is invalid")?;
    Ok(enabled)
}

/// Run every enabled feature to completion or until `cancel` fires.
///
/// Configuration is validated before any sink is opened.
pub async fn run_load_test(
    config: &LoadedConfig,
    cancel: CancellationToken,
) -> anyhow::Result<LoadTestReport> {
    let enabled = validate_config(config)?;
    info!(features = enabled, "Starting load test");

    let sinks = SinkSet::connect(&config.targets).context("Failed to open sinks")?;
    let registry = Arc::new(GeneratorRegistry::new());
    let load_test = LoadTest::bind(&config.features, registry, &sinks)?;

    let result = load_test.run(cancel).await;
    sinks.close().await;
    let report = result?;

    for feature in &report.features {
        info!(
            feature = %feature.name,
            state = %feature.state,
            units = feature.units_produced,
            attempted = feature.items_attempted,
            failed = feature.items_failed,
            "{:.1} units/sec",
            feature.units_per_second()
        );
    }
    Ok(report)
}

/// Write a run report as pretty JSON.
pub fn write_report(path: &Path, report: &LoadTestReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report to {path:?}"))?;
    info!("Report written to {path:?}");
    Ok(())
}
