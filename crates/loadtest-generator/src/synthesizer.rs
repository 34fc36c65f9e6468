//! Per-unit record synthesis.
//!
//! A [`Synthesizer`] owns the RNG for one feature. Each call to
//! [`Synthesizer::synthesize_unit`] produces one [`SyntheticRecord`] holding
//! one value per KeyMeta field; every schema projection of that unit reads
//! from the same record.

use crate::registry::{GeneratorError, GeneratorRegistry};
use loadtest_core::{
    Feature, GeneratedValue, KeyMeta, KeyMetaEntry, SchemaMap, SchemaNode, SyntheticRecord,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// Build the RNG for a feature: seeded when a seed is given, entropy otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Generates records from a KeyMeta vocabulary.
pub struct Synthesizer<'a> {
    registry: &'a GeneratorRegistry,
    fields: Vec<(&'a str, &'a KeyMetaEntry)>,
    rng: StdRng,
}

impl<'a> Synthesizer<'a> {
    /// Synthesizer over every entry of `key_meta`.
    pub fn new(registry: &'a GeneratorRegistry, key_meta: &'a KeyMeta, rng: StdRng) -> Self {
        let fields = key_meta
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
            .collect();
        Self {
            registry,
            fields,
            rng,
        }
    }

    /// Synthesizer over the KeyMeta fields a feature's enabled schemas read.
    ///
    /// Entries no enabled schema references are never generated, so they
    /// are not subject to validation either.
    pub fn for_feature(registry: &'a GeneratorRegistry, feature: &'a Feature) -> Self {
        let used = referenced_identifiers(feature);
        let fields = feature
            .key_meta
            .iter()
            .filter(|(name, _)| used.contains(name.as_str()))
            .map(|(name, entry)| (name.as_str(), entry))
            .collect();
        Self {
            registry,
            fields,
            rng: rng_for(feature.seed),
        }
    }

    /// Number of fields generated per record.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Produce one record.
    pub fn synthesize_unit(&mut self) -> Result<SyntheticRecord, GeneratorError> {
        let mut record = SyntheticRecord::with_capacity(self.fields.len());
        for &(name, entry) in &self.fields {
            let value = match entry {
                KeyMetaEntry::Literal(raw) => GeneratedValue::from(raw),
                KeyMetaEntry::Generated { kind, .. } => {
                    let kind = kind
                        .as_deref()
                        .ok_or_else(|| GeneratorError::MissingKind(name.to_string()))?;
                    self.registry
                        .generate_named(kind, entry.meta_map(), &mut self.rng)?
                }
            };
            record.insert(name, value);
        }
        Ok(record)
    }

    /// Produce `n` independent records.
    pub fn synthesize_batch(&mut self, n: usize) -> Result<Vec<SyntheticRecord>, GeneratorError> {
        (0..n).map(|_| self.synthesize_unit()).collect()
    }
}

/// KeyMeta identifiers read by the enabled schemas of a feature.
pub fn referenced_identifiers(feature: &Feature) -> BTreeSet<&str> {
    let mut used = BTreeSet::new();
    for (_, schema) in feature
        .enabled_api_schemas()
        .chain(feature.enabled_stream_schemas())
    {
        collect_identifiers(&schema.definition, &mut used);
    }
    used
}

fn collect_identifiers<'a>(map: &'a SchemaMap, used: &mut BTreeSet<&'a str>) {
    for (key, node) in map {
        match node {
            SchemaNode::Leaf { alias } => {
                used.insert(alias.as_deref().unwrap_or(key));
            }
            SchemaNode::Object { children } => collect_identifiers(children, used),
            SchemaNode::Array { element, .. } => collect_identifiers(element, used),
        }
    }
}
