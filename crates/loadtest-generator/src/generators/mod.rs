//! Individual value generators for the supported generator kinds.
//!
//! Each submodule implements one kind. Parameters are read leniently from
//! the KeyMeta `meta` map: a missing number reads as zero and a missing
//! string as empty, since malformed metadata is rejected by the validator
//! before any run starts.

pub mod array;
pub mod numeric;
pub mod string;
pub mod timestamp;
pub mod uuid;

use serde_json::{Map, Value};

/// Read a numeric parameter, defaulting to zero.
pub(crate) fn meta_f64(meta: &Map<String, Value>, key: &str) -> f64 {
    meta.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Read a string parameter.
pub(crate) fn meta_str<'a>(meta: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    meta.get(key).and_then(Value::as_str)
}
