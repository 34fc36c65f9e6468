//! Projection of a record onto a schema tree, and payload encoding.

use loadtest_core::{GeneratedValue, SchemaMap, SchemaNode, SyntheticRecord};
use std::collections::BTreeMap;
use tracing::warn;

/// Error encoding one projected payload.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Failed to encode payload as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the payload tree for one record.
///
/// Leaves read the record by their identifier (the alias if set, else the
/// key). Arrays repeat the element projection `length` times against the
/// same record. A leaf with no value in the record projects to null.
pub fn project(root: &SchemaMap, record: &SyntheticRecord) -> GeneratedValue {
    GeneratedValue::Object(project_map(root, record))
}

fn project_map(map: &SchemaMap, record: &SyntheticRecord) -> BTreeMap<String, GeneratedValue> {
    map.iter()
        .map(|(key, node)| (key.clone(), project_node(key, node, record)))
        .collect()
}

fn project_node(key: &str, node: &SchemaNode, record: &SyntheticRecord) -> GeneratedValue {
    match node {
        SchemaNode::Leaf { alias } => record
            .get(alias.as_deref().unwrap_or(key))
            .cloned()
            .unwrap_or(GeneratedValue::Null),
        SchemaNode::Object { children } => GeneratedValue::Object(project_map(children, record)),
        SchemaNode::Array { length, element } => GeneratedValue::Array(
            (0..*length)
                .map(|_| GeneratedValue::Object(project_map(element, record)))
                .collect(),
        ),
    }
}

/// Encode a payload as JSON bytes.
pub fn encode_json(value: &GeneratedValue) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(value)?)
}

/// Project and encode every record of a batch for one schema.
///
/// Units that fail to encode are logged and left out of the result.
pub fn encode_batch(schema: &str, root: &SchemaMap, records: &[SyntheticRecord]) -> Vec<Vec<u8>> {
    records
        .iter()
        .enumerate()
        .filter_map(|(unit, record)| match encode_json(&project(root, record)) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(schema, unit, "Skipping unit: {e}");
                None
            }
        })
        .collect()
}
