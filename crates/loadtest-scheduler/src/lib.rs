//! Load generation scheduler for stressity.
//!
//! Every enabled feature runs its own batch loop on a separate task:
//!
//! ```text
//!   LoadTest ──spawn──► FeatureRunner (one per feature)
//!                          │  synthesize n units
//!                          │  encode per schema
//!                          ├──spawn──► sink.send_batch(api schema)
//!                          ├──spawn──► sink.send_batch(stream schema)
//!                          │  sleep batch interval
//!                          ▼
//!                     FeatureReport
//! ```
//!
//! Progress counts units produced, not units delivered. Delivery failures
//! are logged and counted in the report but never stop or retry a batch.

pub mod error;
pub mod report;
pub mod runner;
pub mod tracker;

pub use error::SchedulerError;
pub use load_test::LoadTest;
pub use report::{FeatureReport, LoadTestReport, RunState};
pub use runner::FeatureRunner;
pub use tracker::DispatchTracker;
