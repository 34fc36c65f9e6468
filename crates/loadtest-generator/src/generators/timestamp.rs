//! Time value generator.
//!
//! The base instant is the current time unless both `customFormat` and
//! `customVal` are given and parse, in which case it is the parsed instant.
//! A value that fails to parse silently falls back to now.
//!
//! `outputFormat` selects the output:
//! - `epoch` / `epochSec` - whole seconds
//! - `epochMS` - whole seconds x 1000
//! - `epochNS` - nanoseconds
//! - any other value - a strftime pattern
//!
//! Without `outputFormat` the raw instant is returned. `outputType: "string"`
//! stringifies the output.

use super::meta_str;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use loadtest_core::GeneratedValue;
use serde_json::{Map, Value};
use std::fmt::Write;

/// `customFormat` keyword for RFC 3339 input.
pub const RFC3339: &str = "rfc3339";

/// Generate a time value relative to the current clock.
pub fn generate_time(meta: &Map<String, Value>) -> GeneratedValue {
    generate_time_at(meta, Utc::now())
}

/// Generate a time value using `now` as the current instant.
pub fn generate_time_at(meta: &Map<String, Value>, now: DateTime<Utc>) -> GeneratedValue {
    let base = match (meta_str(meta, "customFormat"), meta_str(meta, "customVal")) {
        (Some(format), Some(value)) => parse_instant(format, value).unwrap_or(now),
        _ => now,
    };

    let Some(output_format) = meta_str(meta, "outputFormat") else {
        return GeneratedValue::DateTime(base);
    };

    let output = match output_format {
        "epoch" | "epochSec" => GeneratedValue::Int64(base.timestamp()),
        "epochMS" => GeneratedValue::Int64(base.timestamp() * 1000),
        "epochNS" => GeneratedValue::Int64(
            base.timestamp_nanos_opt()
                .unwrap_or_else(|| base.timestamp().saturating_mul(1_000_000_000)),
        ),
        pattern => GeneratedValue::String(format_instant(&base, pattern)),
    };

    if meta_str(meta, "outputType") == Some("string") {
        return match output {
            GeneratedValue::Int64(i) => GeneratedValue::String(i.to_string()),
            other => other,
        };
    }
    output
}

/// Parse `value` with a strftime `format`.
///
/// Formats without an offset are read as UTC; date-only formats as
/// midnight UTC.
pub fn parse_instant(format: &str, value: &str) -> Option<DateTime<Utc>> {
    if format.eq_ignore_ascii_case(RFC3339) {
        return DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, format) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, format) {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Whether chrono accepts `pattern` as a strftime format.
pub fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

fn format_instant(instant: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", instant.format(pattern)).is_err() {
        // Unreachable for validated patterns.
        return instant.to_rfc3339();
    }
    out
}
