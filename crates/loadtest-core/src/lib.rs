//! Core types for the stressity load generator.
//!
//! This crate provides the configuration model and value types shared by
//! every other crate in the workspace:
//!
//! - [`FeatureSet`] / [`Feature`] - load-test features loaded from `schemas.json`
//! - [`KeyMeta`] / [`KeyMetaEntry`] - per-feature field vocabulary
//! - [`SchemaNode`] - closed payload tree (leaf, object, fixed-length array)
//! - [`TargetConfig`] - API and stream targets loaded from `config.json`
//! - [`GeneratedValue`] / [`SyntheticRecord`] - synthesized data
//!
//! # Architecture
//!
//! ```text
//! loadtest-core (this crate)
//!    │
//!    ├─── loadtest-generator  (registry, validator, synthesizer)
//!    ├─── loadtest-sink       (API and stream sinks)
//!    └─── loadtest-scheduler  (per-feature batch loop)
//! ```

pub mod error;
pub mod schema;
pub mod targets;
pub mod values;

// Re-exports for convenience
pub use error::{ConfigError, TargetKind};
pub use schema::{
    Feature, FeatureSet, KeyMeta, KeyMetaEntry, SchemaDefinition, SchemaMap, SchemaNode,
};
pub use targets::{ApiTarget, StreamTarget, TargetConfig};
pub use values::{GeneratedValue, SyntheticRecord};
