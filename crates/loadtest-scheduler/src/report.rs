//! Run reports.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Terminal state of a feature run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Count or duration bound reached
    Completed,
    /// Stopped early by a shutdown request
    StoppedByCancellation,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Completed => write!(f, "completed"),
            RunState::StoppedByCancellation => write!(f, "stopped"),
        }
    }
}

/// Summary of one feature run.
///
/// `units_produced` counts synthesized units whether or not they were
/// delivered; delivery shows up in the item counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureReport {
    pub name: String,
    pub state: RunState,
    pub units_produced: u64,
    pub batches: u64,
    pub dispatches_submitted: u64,
    pub dispatches_completed: u64,
    pub items_attempted: u64,
    pub items_failed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FeatureReport {
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Produced units per second over the whole run.
    pub fn units_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.units_produced as f64 / secs
        } else {
            0.0
        }
    }
}

/// Reports for every feature of a load test, in feature name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadTestReport {
    pub features: Vec<FeatureReport>,
}

impl LoadTestReport {
    pub fn total_units(&self) -> u64 {
        self.features.iter().map(|f| f.units_produced).sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.features.iter().map(|f| f.items_failed).sum()
    }

    /// Whether every feature ran to its bound.
    pub fn all_completed(&self) -> bool {
        self.features
            .iter()
            .all(|f| f.state == RunState::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(name: &str, units: u64, state: RunState) -> FeatureReport {
        let started_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        FeatureReport {
            name: name.to_string(),
            state,
            units_produced: units,
            batches: 1,
            dispatches_submitted: 1,
            dispatches_completed: 1,
            items_attempted: units,
            items_failed: 1,
            started_at,
            finished_at: started_at + chrono::Duration::seconds(2),
        }
    }

    #[test]
    fn test_feature_rates() {
        let r = report("a", 10, RunState::Completed);
        assert_eq!(r.elapsed(), Duration::from_secs(2));
        assert_eq!(r.units_per_second(), 5.0);
    }

    #[test]
    fn test_totals() {
        let summary = LoadTestReport {
            features: vec![
                report("a", 10, RunState::Completed),
                report("b", 5, RunState::StoppedByCancellation),
            ],
        };
        assert_eq!(summary.total_units(), 15);
        assert_eq!(summary.total_failed(), 2);
        assert!(!summary.all_completed());
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&RunState::StoppedByCancellation).unwrap(),
            "\"stopped_by_cancellation\""
        );
        assert_eq!(RunState::Completed.to_string(), "completed");
    }
}
