//! stressity: declarative load generation against HTTP APIs and Kafka topics.
//!
//! The binary is a thin layer over the workspace crates:
//! `loadtest-core` (configuration), `loadtest-generator` (synthesis),
//! `loadtest-sink` (transports) and `loadtest-scheduler` (batch loops).

pub mod config;
pub mod driver;

pub use config::{ConfigPaths, LoadedConfig};
pub use driver::{run_load_test, validate_config, write_report};
