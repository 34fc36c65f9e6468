//! Random selection from a candidate array.

use crate::registry::GeneratorError;
use loadtest_core::GeneratedValue;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{Map, Value};

/// Pick one element of the `val` array uniformly.
pub fn generate_random_from_array<R: Rng>(
    meta: &Map<String, Value>,
    rng: &mut R,
) -> Result<GeneratedValue, GeneratorError> {
    let candidates = meta
        .get("val")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    candidates
        .choose(rng)
        .map(GeneratedValue::from)
        .ok_or(GeneratorError::EmptyCandidates)
}
