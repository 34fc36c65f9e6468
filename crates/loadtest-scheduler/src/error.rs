//! Scheduler error types.

use loadtest_core::{ConfigError, TargetKind};
use loadtest_generator::GeneratorError;
use thiserror::Error;

/// Errors that stop a load test.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No open {kind} sink for schema {schema} in feature {feature}")]
    MissingSink {
        kind: TargetKind,
        feature: String,
        schema: String,
    },

    #[error("Generator failed in feature {feature}: {source}")]
    Generator {
        feature: String,
        #[source]
        source: GeneratorError,
    },

    #[error("Feature task failed: {0}")]
    Task(String),
}
