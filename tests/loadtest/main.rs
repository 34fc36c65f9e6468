//! End-to-end tests for the stressity driver.
//!
//! No external services are needed: API targets point at an in-process
//! HTTP listener and no test enables a Kafka target it sends to.

mod api_loadtest;
mod server;
mod validate;
