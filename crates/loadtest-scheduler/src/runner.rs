//! Per-feature batch loop.
//!
//! Each iteration synthesizes `min(batchSize, remaining)` units, encodes
//! them once per enabled schema and hands every encoded batch to its sink
//! on a separate task. The loop never waits for those tasks; it sleeps the
//! batch interval (fixed delay) and goes again until the count or duration
//! bound is reached. Send tasks are drained before the run reports.

use crate::error::SchedulerError;
use crate::report::{FeatureReport, RunState};
use crate::tracker::DispatchTracker;
use chrono::Utc;
use loadtest_core::{Feature, SchemaMap, TargetKind};
use loadtest_generator::{encode_batch, GeneratorRegistry, Synthesizer};
use loadtest_sink::{BatchSink, SinkSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One enabled schema bound to its sink.
struct Route {
    kind: TargetKind,
    schema: String,
    root: SchemaMap,
    sink: Arc<dyn BatchSink>,
}

/// Runs one feature's batch loop.
pub struct FeatureRunner {
    name: String,
    feature: Feature,
    registry: Arc<GeneratorRegistry>,
    routes: Vec<Route>,
    tracker: Arc<DispatchTracker>,
}

impl FeatureRunner {
    /// Bind every enabled schema of `feature` to its open sink.
    ///
    /// API schemas come first, then stream schemas, each in name order.
    pub fn new(
        name: impl Into<String>,
        feature: Feature,
        registry: Arc<GeneratorRegistry>,
        sinks: &SinkSet,
    ) -> Result<Self, SchedulerError> {
        let name = name.into();
        let schemas = feature
            .enabled_api_schemas()
            .map(|(schema, def)| (TargetKind::Api, schema, def))
            .chain(
                feature
                    .enabled_stream_schemas()
                    .map(|(schema, def)| (TargetKind::Stream, schema, def)),
            );

        let mut routes = Vec::new();
        for (kind, schema, definition) in schemas {
            let sink = sinks
                .get(kind, schema)
                .ok_or_else(|| SchedulerError::MissingSink {
                    kind,
                    feature: name.clone(),
                    schema: schema.clone(),
                })?;
            routes.push(Route {
                kind,
                schema: schema.clone(),
                root: definition.definition.clone(),
                sink,
            });
        }

        Ok(Self {
            name,
            feature,
            registry,
            routes,
            tracker: Arc::new(DispatchTracker::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dispatch counters, readable while the run is in progress.
    pub fn tracker(&self) -> Arc<DispatchTracker> {
        Arc::clone(&self.tracker)
    }

    /// Run until a bound is reached or `cancel` fires.
    ///
    /// Cancellation stops production; dispatches already submitted are
    /// still awaited.
    pub async fn run(self, cancel: CancellationToken) -> Result<FeatureReport, SchedulerError> {
        let Self {
            name,
            feature,
            registry,
            routes,
            tracker,
        } = self;

        let mut synth = Synthesizer::for_feature(&registry, &feature);
        let interval = Duration::from_millis(feature.batch_interval_ms);
        let started = Instant::now();
        // None when the duration overflows the clock; the total count bounds the run.
        let deadline = started.checked_add(Duration::from_secs(feature.run_duration_sec));
        let started_at = Utc::now();

        info!(
            feature = %name,
            batch_size = feature.batch_size,
            total_count = feature.total_count,
            run_duration_sec = feature.run_duration_sec,
            interval_ms = feature.batch_interval_ms,
            schemas = routes.len(),
            "Starting feature"
        );

        let mut produced = 0u64;
        let mut batches = 0u64;
        let mut dispatches = JoinSet::new();

        let state = loop {
            let expired = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if produced >= feature.total_count || expired {
                break RunState::Completed;
            }
            if cancel.is_cancelled() {
                break RunState::StoppedByCancellation;
            }

            let n = feature.batch_size.min(feature.total_count - produced);
            let records = synth
                .synthesize_batch(n as usize)
                .map_err(|source| SchedulerError::Generator {
                    feature: name.clone(),
                    source,
                })?;
            batches += 1;

            for route in &routes {
                let payloads = encode_batch(&route.schema, &route.root, &records);
                if payloads.is_empty() {
                    continue;
                }

                tracker.submit();
                let sink = Arc::clone(&route.sink);
                let tracker = Arc::clone(&tracker);
                let feature_name = name.clone();
                let schema = route.schema.clone();
                let kind = route.kind;
                let batch = batches;
                dispatches.spawn(async move {
                    let outcome = sink.send_batch(payloads).await;
                    tracker.complete(&outcome);
                    match outcome.errors.first() {
                        Some(first) => warn!(
                            feature = %feature_name,
                            schema = %schema,
                            kind = %kind,
                            batch,
                            attempted = outcome.attempted,
                            failed = outcome.failed,
                            "Dispatch failed: {first}"
                        ),
                        None => debug!(
                            feature = %feature_name,
                            schema = %schema,
                            kind = %kind,
                            batch,
                            attempted = outcome.attempted,
                            "Dispatch delivered"
                        ),
                    }
                });
            }

            produced += n;
            info!(feature = %name, batch = batches, produced, "Batch produced");

            while let Some(result) = dispatches.try_join_next() {
                log_join_error(&name, result);
            }

            if produced >= feature.total_count {
                continue;
            }
            tokio::select! {
                _ = cancel.cancelled() => break RunState::StoppedByCancellation,
                _ = tokio::time::sleep(interval) => {}
            }
        };

        if tracker.in_flight() > 0 {
            debug!(
                feature = %name,
                in_flight = tracker.in_flight(),
                "Waiting for in-flight dispatches"
            );
        }
        while let Some(result) = dispatches.join_next().await {
            log_join_error(&name, result);
        }

        let report = FeatureReport {
            name,
            state,
            units_produced: produced,
            batches,
            dispatches_submitted: tracker.submitted(),
            dispatches_completed: tracker.completed(),
            items_attempted: tracker.attempted(),
            items_failed: tracker.failed(),
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            feature = %report.name,
            state = %report.state,
            units = report.units_produced,
            batches = report.batches,
            failed_items = report.items_failed,
            started_at = %report.started_at.to_rfc3339(),
            finished_at = %report.finished_at.to_rfc3339(),
            "Feature finished in {:?}",
            started.elapsed()
        );
        Ok(report)
    }
}

fn log_join_error(feature: &str, result: Result<(), JoinError>) {
    if let Err(e) = result {
        warn!(feature, "Dispatch task failed: {e}");
    }
}
