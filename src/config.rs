//! Configuration file locations and loading.

use anyhow::Context;
use clap::Args;
use loadtest_core::{FeatureSet, TargetConfig};
use std::path::PathBuf;

/// Paths of the two configuration files.
#[derive(Args, Debug, Clone)]
pub struct ConfigPaths {
    /// Target configuration (API and stream targets)
    #[arg(long, env = "STRESSITY_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Feature definitions (KeyMeta and payload schemas)
    #[arg(long, env = "STRESSITY_SCHEMAS", default_value = "schemas.json")]
    pub schemas: PathBuf,
}

/// Both configuration files, decoded.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub targets: TargetConfig,
    pub features: FeatureSet,
}

impl ConfigPaths {
    pub fn load(&self) -> anyhow::Result<LoadedConfig> {
        let targets = TargetConfig::from_file(&self.config)
            .with_context(|| format!("Failed to load targets from {:?}", self.config))?;
        let features = FeatureSet::from_file(&self.schemas)
            .with_context(|| format!("Failed to load features from {:?}", self.schemas))?;

        tracing::debug!(
            apis = targets.apis.len(),
            streams = targets.streams.len(),
            features = features.feature_names().len(),
            "Configuration loaded"
        );
        Ok(LoadedConfig { targets, features })
    }
}
