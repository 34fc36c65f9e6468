//! Configuration error types.

use std::path::PathBuf;

/// Which kind of target a schema is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Api,
    Stream,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Api => write!(f, "api"),
            TargetKind::Stream => write!(f, "stream"),
        }
    }
}

/// Errors found while loading or validating configuration.
///
/// Every validation variant names the feature and schema it was found in,
/// and the schema key where one applies.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading a configuration file
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding JSON
    #[error("Failed to parse {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// No enabled feature in the feature set
    #[error("no features to run")]
    NoFeatures,

    /// Feature cannot produce anything with a zero batch size
    #[error("batch size must be positive for feature {feature}")]
    ZeroBatchSize { feature: String },

    /// Schema refers to a target that is missing or disabled
    #[error("{kind} config is not present or not enabled for schema {schema} in feature {feature}")]
    MissingTarget {
        kind: TargetKind,
        feature: String,
        schema: String,
    },

    /// Object node (or schema root) without children
    #[error("no object map entries for key {key} in schema {schema} for feature {feature}")]
    EmptyObject {
        feature: String,
        schema: String,
        key: String,
    },

    /// Leaf whose identifier has no KeyMeta entry
    #[error("meta {identifier} not found for key {key} in schema {schema} for feature {feature}")]
    MissingKeyMeta {
        feature: String,
        schema: String,
        key: String,
        identifier: String,
    },

    /// Generated KeyMeta entry without a `type`
    #[error("type not found for key {key} in key meta for schema {schema} for feature {feature}")]
    MissingType {
        feature: String,
        schema: String,
        key: String,
    },

    /// Generator kind unknown to the registry
    #[error("type {kind} not supported (key {key} in schema {schema} for feature {feature})")]
    UnknownType {
        feature: String,
        schema: String,
        key: String,
        kind: String,
    },

    /// Kind that needs parameters has no `meta`
    #[error("meta not found for key {key} in key meta for schema {schema} for feature {feature}")]
    MissingMeta {
        feature: String,
        schema: String,
        key: String,
    },

    /// `meta` is present but not a JSON object
    #[error("meta not a map for key {key} in schema {schema} for feature {feature}")]
    MetaNotObject {
        feature: String,
        schema: String,
        key: String,
    },

    /// `time` generator with a pattern chrono cannot format with
    #[error("invalid time format {format:?} for key {key} in schema {schema} for feature {feature}")]
    InvalidTimeFormat {
        feature: String,
        schema: String,
        key: String,
        format: String,
    },

    /// `randomFromArray` without a non-empty `val` array
    #[error("no candidate values for key {key} in schema {schema} for feature {feature}")]
    EmptyCandidates {
        feature: String,
        schema: String,
        key: String,
    },
}

impl ConfigError {
    pub(crate) fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        ConfigError::Decode {
            what: what.into(),
            source,
        }
    }
}
