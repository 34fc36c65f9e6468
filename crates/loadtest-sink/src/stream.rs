//! Kafka stream sink.
//!
//! One [`StreamSink`] per target wraps a single `FutureProducer` opened with
//! `acks=all` and the target name as `client.id`. A batch is enqueued in one
//! pass and awaited as a unit; the first delivery error fails the whole
//! batch.

use crate::error::{DeliveryError, SinkError};
use crate::outcome::BatchOutcome;
use crate::BatchSink;
use async_trait::async_trait;
use futures::future::join_all;
use loadtest_core::{StreamTarget, TargetKind};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a record may wait in the local queue.
pub const QUEUE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long shutdown waits for outstanding deliveries.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Producer configuration for a stream target.
pub fn producer_config(name: &str, target: &StreamTarget) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", target.bootstrap_servers())
        .set("client.id", name)
        .set("acks", "all")
        .set("message.timeout.ms", "30000")
        .set("queue.buffering.max.messages", "100000")
        .set("linger.ms", "5");
    config
}

/// Durable publisher for one stream target.
pub struct StreamSink {
    name: String,
    topic: String,
    producer: FutureProducer,
}

impl StreamSink {
    /// Open the producer for `target`.
    pub fn connect(name: &str, target: &StreamTarget) -> Result<Self, SinkError> {
        let producer: FutureProducer =
            producer_config(name, target)
                .create()
                .map_err(|source| SinkError::Kafka {
                    target: name.to_string(),
                    source,
                })?;

        debug!(
            sink = name,
            brokers = %target.bootstrap_servers(),
            topic = %target.topic,
            "Stream sink ready"
        );

        Ok(Self {
            name: name.to_string(),
            topic: target.topic.clone(),
            producer,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl BatchSink for StreamSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TargetKind {
        TargetKind::Stream
    }

    async fn send_batch(&self, payloads: Vec<Vec<u8>>) -> BatchOutcome {
        let attempted = payloads.len();
        if attempted == 0 {
            return BatchOutcome::default();
        }

        let deliveries = payloads.iter().map(|payload| {
            let record = FutureRecord::<(), [u8]>::to(&self.topic).payload(payload.as_slice());
            self.producer.send(record, QUEUE_TIMEOUT)
        });

        let first_error = join_all(deliveries)
            .await
            .into_iter()
            .find_map(|result| result.err());

        match first_error {
            None => BatchOutcome::delivered(attempted),
            Some((err, _)) => {
                BatchOutcome::batch_failed(attempted, DeliveryError::Publish(err.to_string()))
            }
        }
    }

    async fn close(&self) {
        let producer = self.producer.clone();
        let name = self.name.clone();
        let flushed =
            tokio::task::spawn_blocking(move || producer.flush(Timeout::After(FLUSH_TIMEOUT)))
                .await;

        match flushed {
            Ok(Ok(())) => info!(sink = %name, "Stream sink flushed"),
            Ok(Err(e)) => warn!(sink = %name, "Failed to flush stream sink: {e}"),
            Err(e) => warn!(sink = %name, "Flush task failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> StreamTarget {
        StreamTarget {
            enabled: true,
            brokers: vec!["localhost:9092".to_string(), "localhost:9093".to_string()],
            topic: "events".to_string(),
        }
    }

    #[test]
    fn test_producer_config() {
        let config = producer_config("orders-stream", &target());
        assert_eq!(
            config.get("bootstrap.servers"),
            Some("localhost:9092,localhost:9093")
        );
        assert_eq!(config.get("client.id"), Some("orders-stream"));
        assert_eq!(config.get("acks"), Some("all"));
    }

    #[tokio::test]
    async fn test_connect_without_broker() {
        // Producer creation is lazy; no broker needs to be reachable.
        let sink = tokio_test::assert_ok!(StreamSink::connect("orders-stream", &target()));
        assert_eq!(sink.name(), "orders-stream");
        assert_eq!(sink.topic(), "events");
        assert_eq!(sink.kind(), TargetKind::Stream);
        assert_eq!(sink.send_batch(Vec::new()).await, BatchOutcome::default());
    }
}
