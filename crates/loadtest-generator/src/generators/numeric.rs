//! Numeric value generators.
//!
//! Both generators draw from the half-open range `[min, max)`. When the
//! range is empty or inverted they fall back to `[min, min + 100000)`.

use loadtest_core::GeneratedValue;
use rand::Rng;

/// Width of the fallback range used when `max <= min`.
pub const DEFAULT_RANGE: f64 = 100_000.0;

/// Generate a uniform float in `[min, max)`.
pub fn generate_number<R: Rng>(rng: &mut R, min: f64, max: f64) -> GeneratedValue {
    let mut range = max - min;
    if range <= 0.0 {
        range = DEFAULT_RANGE;
    }
    GeneratedValue::Float64(min + range * rng.random::<f64>())
}

/// Generate a uniform integer in `[min, max)` on bounds truncated toward zero.
pub fn generate_integer<R: Rng>(rng: &mut R, min: f64, max: f64) -> GeneratedValue {
    let min = min as i64;
    let max = max as i64;
    let range = match max.checked_sub(min) {
        Some(range) if range > 0 => range,
        _ => DEFAULT_RANGE as i64,
    };
    GeneratedValue::Int64(min.saturating_add(rng.random_range(0..range)))
}
