//! Dispatch accounting shared between a feature loop and its send tasks.

use loadtest_sink::BatchOutcome;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for submitted and completed dispatches of one feature.
#[derive(Debug, Default)]
pub struct DispatchTracker {
    submitted: AtomicU64,
    completed: AtomicU64,
    attempted: AtomicU64,
    failed: AtomicU64,
}

impl DispatchTracker {
    pub fn submit(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished dispatch.
    pub fn complete(&self, outcome: &BatchOutcome) {
        self.attempted
            .fetch_add(outcome.attempted as u64, Ordering::Relaxed);
        self.failed
            .fetch_add(outcome.failed as u64, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Release);
    }

    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Dispatches submitted but not yet finished.
    pub fn in_flight(&self) -> u64 {
        self.submitted().saturating_sub(self.completed())
    }

    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtest_sink::DeliveryError;

    #[test]
    fn test_counts() {
        let tracker = DispatchTracker::default();
        tracker.submit();
        tracker.submit();
        assert_eq!(tracker.in_flight(), 2);

        tracker.complete(&BatchOutcome::delivered(4));
        tracker.complete(&BatchOutcome::batch_failed(
            3,
            DeliveryError::Publish("down".to_string()),
        ));

        assert_eq!(tracker.submitted(), 2);
        assert_eq!(tracker.completed(), 2);
        assert_eq!(tracker.in_flight(), 0);
        assert_eq!(tracker.attempted(), 7);
        assert_eq!(tracker.failed(), 3);
    }
}
