//! Error types for sinks.

use thiserror::Error;

/// Errors opening a sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("HTTP client error for target {target}: {source}")]
    Client {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid HTTP method {method:?} for target {target}")]
    InvalidMethod { target: String, method: String },

    #[error("Invalid header {name:?} for target {target}: {reason}")]
    InvalidHeader {
        target: String,
        name: String,
        reason: String,
    },

    #[error("Invalid URL {url:?} for target {target}: {reason}")]
    InvalidUrl {
        target: String,
        url: String,
        reason: String,
    },

    #[error("Kafka error for target {target}: {source}")]
    Kafka {
        target: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    #[error("Failed to open {count} sink(s): {details}")]
    Connect { count: usize, details: String },
}

/// Failure delivering part or all of one batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Request completed with a non-success status
    #[error("item {index}: HTTP status {status}")]
    Status { index: usize, status: u16 },

    /// Request could not be completed
    #[error("item {index}: {message}")]
    Request { index: usize, message: String },

    /// Whole-batch publish failure
    #[error("batch publish failed: {0}")]
    Publish(String),
}
