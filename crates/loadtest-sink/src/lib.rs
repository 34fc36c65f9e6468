//! Transport sinks for stressity.
//!
//! Both sink kinds implement [`BatchSink`]: given one already-encoded batch,
//! deliver it and report what happened. Sending never fails as a whole;
//! transport problems are reported in the returned [`BatchOutcome`].
//!
//! Sinks are opened once per target through [`SinkSet::connect`] and shared
//! behind `Arc` by every feature that sends to them.

pub mod api;
pub mod error;
pub mod outcome;
pub mod stream;

pub use api::ApiSink;
pub use error::{DeliveryError, SinkError};
pub use outcome::BatchOutcome;
pub use stream::StreamSink;

use loadtest_core::{TargetConfig, TargetKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Delivers encoded batches to one target.
#[async_trait::async_trait]
pub trait BatchSink: Send + Sync {
    /// Target name.
    fn name(&self) -> &str;

    fn kind(&self) -> TargetKind;

    /// Deliver one batch of encoded payloads.
    async fn send_batch(&self, payloads: Vec<Vec<u8>>) -> BatchOutcome;

    /// Release transport resources, waiting for outstanding deliveries.
    async fn close(&self) {}
}

/// Every opened sink, keyed by target kind and name.
#[derive(Clone, Default)]
pub struct SinkSet {
    apis: BTreeMap<String, Arc<dyn BatchSink>>,
    streams: BTreeMap<String, Arc<dyn BatchSink>>,
}

impl SinkSet {
    /// Open a sink for every enabled target.
    ///
    /// All targets are attempted; failures are reported together.
    pub fn connect(targets: &TargetConfig) -> Result<Self, SinkError> {
        let mut sinks = SinkSet::default();
        let mut failures = Vec::new();

        for (name, target) in targets.enabled_apis() {
            match ApiSink::connect(name, target) {
                Ok(sink) => sinks.insert(Arc::new(sink)),
                Err(e) => failures.push(e.to_string()),
            }
        }
        for (name, target) in targets.enabled_streams() {
            match StreamSink::connect(name, target) {
                Ok(sink) => sinks.insert(Arc::new(sink)),
                Err(e) => failures.push(e.to_string()),
            }
        }

        if !failures.is_empty() {
            return Err(SinkError::Connect {
                count: failures.len(),
                details: failures.join("; "),
            });
        }

        info!(
            apis = sinks.apis.len(),
            streams = sinks.streams.len(),
            "Sinks opened"
        );
        Ok(sinks)
    }

    /// Add a sink under its own kind and name, replacing any previous one.
    pub fn insert(&mut self, sink: Arc<dyn BatchSink>) {
        let name = sink.name().to_string();
        match sink.kind() {
            TargetKind::Api => self.apis.insert(name, sink),
            TargetKind::Stream => self.streams.insert(name, sink),
        };
    }

    pub fn get(&self, kind: TargetKind, name: &str) -> Option<Arc<dyn BatchSink>> {
        match kind {
            TargetKind::Api => self.apis.get(name).cloned(),
            TargetKind::Stream => self.streams.get(name).cloned(),
        }
    }

    pub fn len(&self) -> usize {
        self.apis.len() + self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every sink.
    pub async fn close(&self) {
        for sink in self.apis.values().chain(self.streams.values()) {
            sink.close().await;
        }
    }
}
