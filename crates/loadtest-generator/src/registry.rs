//! Generator registry.
//!
//! The registry is built once at startup and passed by reference to the
//! validator and the synthesizer. It owns the mapping from generator names
//! in KeyMeta to [`GeneratorKind`]s and dispatches generation.

use crate::generators::{array, meta_f64, numeric, string, timestamp, uuid};
use loadtest_core::GeneratedValue;
use rand::Rng;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Errors raised by generation.
///
/// These are contract violations: validation rejects every configuration
/// that could produce them.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Kind name unknown to the registry
    #[error("Unknown generator kind: {0}")]
    UnknownKind(String),

    /// Generated KeyMeta entry without a kind
    #[error("Key meta entry {0} has no generator kind")]
    MissingKind(String),

    /// Kind requires a parameter map but none was given
    #[error("Generator {0} requires a meta map")]
    MissingMeta(GeneratorKind),

    /// `randomFromArray` with no candidates
    #[error("randomFromArray requires a non-empty `val` array")]
    EmptyCandidates,
}

/// Supported generator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    String,
    Uuid,
    Number,
    Integer,
    Time,
    RandomFromArray,
}

impl GeneratorKind {
    /// All kinds, in declaration order.
    pub const ALL: [GeneratorKind; 6] = [
        GeneratorKind::String,
        GeneratorKind::Uuid,
        GeneratorKind::Number,
        GeneratorKind::Integer,
        GeneratorKind::Time,
        GeneratorKind::RandomFromArray,
    ];

    /// Canonical KeyMeta name.
    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::String => "string",
            GeneratorKind::Uuid => "uuid",
            GeneratorKind::Number => "number",
            GeneratorKind::Integer => "integer",
            GeneratorKind::Time => "time",
            GeneratorKind::RandomFromArray => "randomFromArray",
        }
    }

    /// Whether a KeyMeta entry of this kind must carry a `meta` map.
    pub fn requires_meta(&self) -> bool {
        !matches!(self, GeneratorKind::Uuid | GeneratorKind::Time)
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable name -> kind registry.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry {
    kinds: HashMap<&'static str, GeneratorKind>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    /// Build the registry with every built-in kind.
    pub fn new() -> Self {
        let mut kinds: HashMap<&'static str, GeneratorKind> =
            GeneratorKind::ALL.iter().map(|k| (k.name(), *k)).collect();
        kinds.insert("getRandomFromArray", GeneratorKind::RandomFromArray);
        Self { kinds }
    }

    /// Look up a kind by its KeyMeta name.
    pub fn resolve(&self, name: &str) -> Option<GeneratorKind> {
        self.kinds.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.kinds.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Generate one value of `kind` from its parameters.
    pub fn generate<R: Rng>(
        &self,
        kind: GeneratorKind,
        meta: Option<&Map<String, Value>>,
        rng: &mut R,
    ) -> Result<GeneratedValue, GeneratorError> {
        let meta = match meta {
            Some(meta) => meta,
            None if kind.requires_meta() => return Err(GeneratorError::MissingMeta(kind)),
            None => empty_meta(),
        };

        let value = match kind {
            GeneratorKind::String => string::generate_string(meta, rng),
            GeneratorKind::Uuid => uuid::generate_uuid(rng),
            GeneratorKind::Number => {
                numeric::generate_number(rng, meta_f64(meta, "min"), meta_f64(meta, "max"))
            }
            GeneratorKind::Integer => {
                numeric::generate_integer(rng, meta_f64(meta, "min"), meta_f64(meta, "max"))
            }
            GeneratorKind::Time => timestamp::generate_time(meta),
            GeneratorKind::RandomFromArray => array::generate_random_from_array(meta, rng)?,
        };
        Ok(value)
    }

    /// Generate one value from a kind name.
    pub fn generate_named<R: Rng>(
        &self,
        name: &str,
        meta: Option<&Map<String, Value>>,
        rng: &mut R,
    ) -> Result<GeneratedValue, GeneratorError> {
        let kind = self
            .resolve(name)
            .ok_or_else(|| GeneratorError::UnknownKind(name.to_string()))?;
        self.generate(kind, meta, rng)
    }
}

fn empty_meta() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_resolve() {
        let registry = GeneratorRegistry::new();

        for kind in GeneratorKind::ALL {
            assert_eq!(registry.resolve(kind.name()), Some(kind));
        }
        assert_eq!(
            registry.resolve("getRandomFromArray"),
            Some(GeneratorKind::RandomFromArray)
        );
        assert_eq!(registry.resolve("bool"), None);
        assert_eq!(registry.names().len(), 7);
    }

    #[test]
    fn test_requires_meta() {
        assert!(!GeneratorKind::Uuid.requires_meta());
        assert!(!GeneratorKind::Time.requires_meta());
        assert!(GeneratorKind::String.requires_meta());
        assert!(GeneratorKind::RandomFromArray.requires_meta());
    }

    #[test]
    fn test_generate_without_meta() {
        let registry = GeneratorRegistry::new();
        let mut rng = StdRng::seed_from_u64(42);

        let uuid = registry.generate(GeneratorKind::Uuid, None, &mut rng).unwrap();
        assert!(uuid.as_str().is_some());

        let time = registry.generate(GeneratorKind::Time, None, &mut rng).unwrap();
        assert!(time.as_datetime().is_some());

        let err = registry.generate(GeneratorKind::Number, None, &mut rng);
        assert!(matches!(
            err,
            Err(GeneratorError::MissingMeta(GeneratorKind::Number))
        ));
    }

    #[test]
    fn test_generate_named() {
        let registry = GeneratorRegistry::new();
        let mut rng = StdRng::seed_from_u64(42);
        let meta = json!({"min": 1, "max": 3}).as_object().cloned().unwrap();

        let value = registry
            .generate_named("integer", Some(&meta), &mut rng)
            .unwrap();
        assert!(matches!(value.as_i64(), Some(1) | Some(2)));

        assert!(matches!(
            registry.generate_named("nope", Some(&meta), &mut rng),
            Err(GeneratorError::UnknownKind(_))
        ));
    }
}
