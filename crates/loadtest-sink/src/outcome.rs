//! Result of sending one batch.

use crate::error::DeliveryError;

/// Outcome of one `send_batch` call.
///
/// API sinks report failures per item; stream sinks fail or succeed as a
/// whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Items attempted
    pub attempted: usize,
    /// Items not delivered
    pub failed: usize,
    /// Failure details
    pub errors: Vec<DeliveryError>,
}

impl BatchOutcome {
    /// Outcome for a batch where every item was delivered.
    pub fn delivered(attempted: usize) -> Self {
        Self {
            attempted,
            ..Default::default()
        }
    }

    /// Outcome for a batch that failed as a whole.
    pub fn batch_failed(attempted: usize, error: DeliveryError) -> Self {
        Self {
            attempted,
            failed: attempted,
            errors: vec![error],
        }
    }

    /// Record an item failure.
    pub fn push_failure(&mut self, error: DeliveryError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Fold another partial outcome into this one.
    pub fn merge(&mut self, other: BatchOutcome) {
        self.attempted += other.attempted;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }

    /// Items delivered.
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
