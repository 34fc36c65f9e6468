//! Feature and schema definitions.
//!
//! A feature set is loaded from JSON (`schemas.json`). Each feature owns:
//!
//! - **KeyMeta**: the field vocabulary. Every entry is either a literal
//!   (`{"rawVal": ...}`) or a generator reference (`{"type": ..., "meta": {...}}`).
//! - **API and stream schemas**: named payload trees built from KeyMeta
//!   fields. A schema's name is the name of the target it is sent to.
//!
//! Schema trees are decoded into the closed [`SchemaNode`] union, so a node
//! with an unknown `type` or a missing `objectMap`/`len`/`arrayValues`
//! never reaches validation or synthesis.
//!
//! ```json
//! {
//!   "orders": {
//!     "enabled": true,
//!     "batchSize": 100,
//!     "batchIntervalMs": 1000,
//!     "runDurationSec": 60,
//!     "totalCount": 10000,
//!     "keyMeta": {
//!       "orderId": { "type": "uuid" },
//!       "source": { "rawVal": "loadtest" },
//!       "amount": { "type": "number", "meta": { "min": 1, "max": 500 } }
//!     },
//!     "apiSchemas": {
//!       "orderApi": {
//!         "enabled": true,
//!         "definition": {
//!           "id": { "metaKey": "orderId" },
//!           "detail": { "type": "object", "objectMap": { "amount": {}, "source": {} } }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Child map of an object node (and the root of every schema).
pub type SchemaMap = BTreeMap<String, SchemaNode>;

/// Field vocabulary of one feature.
pub type KeyMeta = BTreeMap<String, KeyMetaEntry>;

// ============================================================================
// KeyMeta
// ============================================================================

/// One KeyMeta entry.
///
/// An entry carrying `rawVal` is a literal, whatever else it contains.
/// Otherwise `type` and `meta` are kept as written; the validator checks
/// them against the generator registry before any run starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub enum KeyMetaEntry {
    /// Literal value copied into every record
    Literal(Value),

    /// Value produced by a generator
    Generated {
        /// Generator kind name
        kind: Option<String>,
        /// Generator parameters
        meta: Option<Value>,
    },
}

impl KeyMetaEntry {
    /// Build a generator entry.
    pub fn generated(kind: impl Into<String>, meta: Option<Value>) -> Self {
        KeyMetaEntry::Generated {
            kind: Some(kind.into()),
            meta,
        }
    }

    /// Parameter map of a generator entry, if it is a JSON object.
    pub fn meta_map(&self) -> Option<&Map<String, Value>> {
        match self {
            KeyMetaEntry::Generated {
                meta: Some(Value::Object(map)),
                ..
            } => Some(map),
            _ => None,
        }
    }
}

impl TryFrom<Map<String, Value>> for KeyMetaEntry {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        if let Some(raw) = map.remove("rawVal") {
            return Ok(KeyMetaEntry::Literal(raw));
        }

        let kind = match map.remove("type") {
            None => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => return Err(format!("key meta `type` must be a string, got {other}")),
        };

        Ok(KeyMetaEntry::Generated {
            kind,
            meta: map.remove("meta"),
        })
    }
}

// ============================================================================
// Schema Trees
// ============================================================================

/// Node of a payload schema tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSchemaNode")]
pub enum SchemaNode {
    /// Value taken from the record, by alias or by the node's own key
    Leaf { alias: Option<String> },

    /// Nested object
    Object { children: SchemaMap },

    /// Fixed-length array whose elements are all projected from one record
    Array { length: usize, element: SchemaMap },
}

impl SchemaNode {
    /// Leaf resolved by its own key.
    pub fn leaf() -> Self {
        SchemaNode::Leaf { alias: None }
    }

    /// Leaf resolved through an explicit KeyMeta identifier.
    pub fn aliased(identifier: impl Into<String>) -> Self {
        SchemaNode::Leaf {
            alias: Some(identifier.into()),
        }
    }

    /// KeyMeta identifier a leaf stored under `key` reads from.
    ///
    /// Returns `None` for object and array nodes.
    pub fn identifier<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        match self {
            SchemaNode::Leaf { alias } => Some(alias.as_deref().unwrap_or(key)),
            _ => None,
        }
    }
}

/// Wire shape of a schema node before it is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchemaNode {
    #[serde(rename = "type")]
    node_type: Option<String>,
    meta_key: Option<String>,
    object_map: Option<SchemaMap>,
    len: Option<usize>,
    array_values: Option<RawArrayValues>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArrayValues {
    object_map: Option<SchemaMap>,
}

impl TryFrom<RawSchemaNode> for SchemaNode {
    type Error = String;

    fn try_from(raw: RawSchemaNode) -> Result<Self, Self::Error> {
        match raw.node_type.as_deref() {
            None => Ok(SchemaNode::Leaf {
                alias: raw.meta_key,
            }),
            Some("object") => {
                let children = raw
                    .object_map
                    .ok_or("object node requires `objectMap`")?;
                Ok(SchemaNode::Object { children })
            }
            Some("array") => {
                let length = raw.len.ok_or("array node requires `len`")?;
                let element = raw
                    .array_values
                    .ok_or("array node requires `arrayValues`")?
                    .object_map
                    .ok_or("array node requires `arrayValues.objectMap`")?;
                Ok(SchemaNode::Array { length, element })
            }
            Some(other) => Err(format!(
                "unknown schema node type `{other}` (expected `object` or `array`)"
            )),
        }
    }
}

/// A named payload schema inside a feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaDefinition {
    /// Whether this schema is dispatched at all
    #[serde(default)]
    pub enabled: bool,

    /// Root child map of the payload
    #[serde(alias = "root")]
    pub definition: SchemaMap,
}

// ============================================================================
// Features
// ============================================================================

/// One independently scheduled load-test configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Disabled features are neither validated nor run
    #[serde(default)]
    pub enabled: bool,

    /// Units per batch
    #[serde(default)]
    pub batch_size: u64,

    /// Delay between batches in milliseconds
    #[serde(default, alias = "batchIntervalInMS")]
    pub batch_interval_ms: u64,

    /// Run duration bound in seconds
    #[serde(default, alias = "runDurationInSec")]
    pub run_duration_sec: u64,

    /// Count bound in units
    #[serde(default)]
    pub total_count: u64,

    /// Seed for reproducible synthesis (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Field vocabulary
    #[serde(default)]
    pub key_meta: KeyMeta,

    /// Schemas sent to API targets
    #[serde(default, alias = "apiSchema")]
    pub api_schemas: BTreeMap<String, SchemaDefinition>,

    /// Schemas sent to stream targets
    #[serde(default, alias = "streamSchema")]
    pub stream_schemas: BTreeMap<String, SchemaDefinition>,
}

impl Feature {
    /// Enabled API schemas in name order.
    pub fn enabled_api_schemas(&self) -> impl Iterator<Item = (&String, &SchemaDefinition)> {
        self.api_schemas.iter().filter(|(_, s)| s.enabled)
    }

    /// Enabled stream schemas in name order.
    pub fn enabled_stream_schemas(&self) -> impl Iterator<Item = (&String, &SchemaDefinition)> {
        self.stream_schemas.iter().filter(|(_, s)| s.enabled)
    }
}

/// All features, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    features: BTreeMap<String, Feature>,
}

impl FeatureSet {
    /// Load a feature set from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::decode(format!("feature set {path:?}"), e))
    }

    /// Parse a feature set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::decode("feature set", e))
    }

    /// Add or replace a feature.
    pub fn insert(&mut self, name: impl Into<String>, feature: Feature) {
        self.features.insert(name.into(), feature);
    }

    /// Get a feature by name.
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.get(name)
    }

    /// All features in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Feature)> {
        self.features.iter()
    }

    /// Enabled features in name order.
    pub fn enabled(&self) -> impl Iterator<Item = (&String, &Feature)> {
        self.features.iter().filter(|(_, f)| f.enabled)
    }

    /// Names of all features.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.keys().map(String::as_str).collect()
    }
}

impl FromIterator<(String, Feature)> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = (String, Feature)>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}
