//! Target descriptors loaded from `config.json`.
//!
//! ```json
//! {
//!   "apiConfigs": {
//!     "orders": { "enabled": true, "url": "http://localhost:8080/orders", "method": "POST",
//!                 "numClients": 4, "pipelineFactor": 2 }
//!   },
//!   "kafkaConfigs": {
//!     "events": { "enabled": true, "brokers": ["localhost:9092"], "topic": "events" }
//!   }
//! }
//! ```
//!
//! Zero or missing pool settings fall back to the defaults below.

use crate::error::{ConfigError, TargetKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default idle connections kept across all hosts.
pub const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 100;
/// Default idle connections kept per host.
pub const DEFAULT_MAX_IDLE_CONNECTIONS_PER_HOST: usize = 30;
/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
/// Default request method.
pub const DEFAULT_METHOD: &str = "POST";

/// Request/response endpoint target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTarget {
    #[serde(default)]
    pub enabled: bool,

    pub url: String,

    #[serde(default = "default_method")]
    pub method: String,

    /// Extra headers; these override the default `Content-Type`
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Accepted and logged only. reqwest has no pool-wide idle cap, so the
    /// per-host limit is the one applied.
    #[serde(default)]
    pub max_idle_connections: usize,

    #[serde(default)]
    pub max_idle_connections_per_host: usize,

    #[serde(default, alias = "timeoutInMS")]
    pub timeout_in_ms: u64,

    /// Number of transport clients in the pool
    #[serde(default)]
    pub num_clients: usize,

    /// Concurrent in-flight senders per client
    #[serde(default)]
    pub pipeline_factor: usize,
}

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

fn or_default<T: PartialEq + Default>(value: T, default: T) -> T {
    if value == T::default() {
        default
    } else {
        value
    }
}

impl ApiTarget {
    /// Create an enabled target with default pool settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: url.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            max_idle_connections: 0,
            max_idle_connections_per_host: 0,
            timeout_in_ms: 0,
            num_clients: 0,
            pipeline_factor: 0,
        }
    }

    /// Configured pool-wide idle limit. Reported, never enforced.
    pub fn max_idle(&self) -> usize {
        or_default(self.max_idle_connections, DEFAULT_MAX_IDLE_CONNECTIONS)
    }

    pub fn max_idle_per_host(&self) -> usize {
        or_default(
            self.max_idle_connections_per_host,
            DEFAULT_MAX_IDLE_CONNECTIONS_PER_HOST,
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(or_default(self.timeout_in_ms, DEFAULT_TIMEOUT_MS))
    }

    pub fn clients(&self) -> usize {
        or_default(self.num_clients, 1)
    }

    pub fn pipeline(&self) -> usize {
        or_default(self.pipeline_factor, 1)
    }

    /// Number of concurrent senders used per batch.
    pub fn worker_count(&self) -> usize {
        self.clients() * self.pipeline()
    }
}

/// Append-only stream target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamTarget {
    #[serde(default)]
    pub enabled: bool,

    pub brokers: Vec<String>,

    pub topic: String,
}

impl StreamTarget {
    /// Brokers joined for `bootstrap.servers`.
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

/// Every configured target, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    #[serde(default, rename = "apiConfigs")]
    pub apis: BTreeMap<String, ApiTarget>,

    #[serde(default, rename = "kafkaConfigs", alias = "streamConfigs")]
    pub streams: BTreeMap<String, StreamTarget>,
}

impl TargetConfig {
    /// Load target configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::decode(format!("target config {path:?}"), e))
    }

    /// Parse target configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::decode("target config", e))
    }

    /// Whether an enabled target of `kind` named `name` exists.
    pub fn has_enabled(&self, kind: TargetKind, name: &str) -> bool {
        match kind {
            TargetKind::Api => self.apis.get(name).is_some_and(|t| t.enabled),
            TargetKind::Stream => self.streams.get(name).is_some_and(|t| t.enabled),
        }
    }

    /// Enabled API targets in name order.
    pub fn enabled_apis(&self) -> impl Iterator<Item = (&String, &ApiTarget)> {
        self.apis.iter().filter(|(_, t)| t.enabled)
    }

    /// Enabled stream targets in name order.
    pub fn enabled_streams(&self) -> impl Iterator<Item = (&String, &StreamTarget)> {
        self.streams.iter().filter(|(_, t)| t.enabled)
    }
}
