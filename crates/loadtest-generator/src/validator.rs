//! Static validation of features before a run.
//!
//! Validation is fail-fast: the first problem found is returned. Features
//! and schemas are visited in name order, API schemas before stream
//! schemas, so the reported error is stable between runs. Disabled features
//! and schemas are skipped entirely.

use crate::generators::timestamp::{is_valid_pattern, RFC3339};
use crate::registry::{GeneratorKind, GeneratorRegistry};
use loadtest_core::{
    ConfigError, Feature, FeatureSet, KeyMeta, KeyMetaEntry, SchemaMap, SchemaNode, TargetConfig,
    TargetKind,
};
use serde_json::Value;
use tracing::debug;

/// Validate every enabled feature against the registry and the targets.
///
/// Returns the number of enabled features.
pub fn validate(
    features: &FeatureSet,
    targets: &TargetConfig,
    registry: &GeneratorRegistry,
) -> Result<usize, ConfigError> {
    let mut enabled = 0;
    for (name, feature) in features.enabled() {
        validate_feature(name, feature, targets, registry)?;
        enabled += 1;
    }

    if enabled == 0 {
        return Err(ConfigError::NoFeatures);
    }
    Ok(enabled)
}

/// Validate one feature's enabled schemas.
pub fn validate_feature(
    name: &str,
    feature: &Feature,
    targets: &TargetConfig,
    registry: &GeneratorRegistry,
) -> Result<(), ConfigError> {
    if feature.batch_size == 0 {
        return Err(ConfigError::ZeroBatchSize {
            feature: name.to_string(),
        });
    }

    let schemas = feature
        .enabled_api_schemas()
        .map(|(schema, def)| (TargetKind::Api, schema, def))
        .chain(
            feature
                .enabled_stream_schemas()
                .map(|(schema, def)| (TargetKind::Stream, schema, def)),
        );

    for (kind, schema, definition) in schemas {
        if !targets.has_enabled(kind, schema) {
            return Err(ConfigError::MissingTarget {
                kind,
                feature: name.to_string(),
                schema: schema.to_string(),
            });
        }

        let ctx = SchemaContext {
            feature: name,
            schema,
            key_meta: &feature.key_meta,
            registry,
        };
        ctx.check_map(schema, &definition.definition)?;
        debug!(feature = name, schema = %schema, kind = %kind, "Schema validated");
    }
    Ok(())
}

struct SchemaContext<'a> {
    feature: &'a str,
    schema: &'a str,
    key_meta: &'a KeyMeta,
    registry: &'a GeneratorRegistry,
}

impl SchemaContext<'_> {
    fn check_map(&self, key: &str, map: &SchemaMap) -> Result<(), ConfigError> {
        if map.is_empty() {
            return Err(ConfigError::EmptyObject {
                feature: self.feature.to_string(),
                schema: self.schema.to_string(),
                key: key.to_string(),
            });
        }
        for (child_key, node) in map {
            self.check_node(child_key, node)?;
        }
        Ok(())
    }

    fn check_node(&self, key: &str, node: &SchemaNode) -> Result<(), ConfigError> {
        match node {
            SchemaNode::Object { children } => self.check_map(key, children),
            SchemaNode::Array { element, .. } => self.check_map(key, element),
            SchemaNode::Leaf { alias } => self.check_leaf(key, alias.as_deref().unwrap_or(key)),
        }
    }

    fn check_leaf(&self, key: &str, identifier: &str) -> Result<(), ConfigError> {
        let entry = self
            .key_meta
            .get(identifier)
            .ok_or_else(|| ConfigError::MissingKeyMeta {
                feature: self.feature.to_string(),
                schema: self.schema.to_string(),
                key: key.to_string(),
                identifier: identifier.to_string(),
            })?;

        let (kind_name, meta) = match entry {
            KeyMetaEntry::Literal(_) => return Ok(()),
            KeyMetaEntry::Generated { kind, meta } => (kind, meta),
        };

        let kind_name = kind_name.as_deref().ok_or_else(|| ConfigError::MissingType {
            feature: self.feature.to_string(),
            schema: self.schema.to_string(),
            key: key.to_string(),
        })?;

        let kind = self
            .registry
            .resolve(kind_name)
            .ok_or_else(|| ConfigError::UnknownType {
                feature: self.feature.to_string(),
                schema: self.schema.to_string(),
                key: key.to_string(),
                kind: kind_name.to_string(),
            })?;

        let meta = match meta {
            None if kind.requires_meta() => {
                return Err(ConfigError::MissingMeta {
                    feature: self.feature.to_string(),
                    schema: self.schema.to_string(),
                    key: key.to_string(),
                })
            }
            None => return Ok(()),
            Some(Value::Object(map)) => map,
            Some(_) if !kind.requires_meta() => return Ok(()),
            Some(_) => {
                return Err(ConfigError::MetaNotObject {
                    feature: self.feature.to_string(),
                    schema: self.schema.to_string(),
                    key: key.to_string(),
                })
            }
        };

        match kind {
            GeneratorKind::RandomFromArray => {
                let has_candidates = meta
                    .get("val")
                    .and_then(Value::as_array)
                    .is_some_and(|val| !val.is_empty());
                if !has_candidates {
                    return Err(ConfigError::EmptyCandidates {
                        feature: self.feature.to_string(),
                        schema: self.schema.to_string(),
                        key: key.to_string(),
                    });
                }
            }
            GeneratorKind::Time => {
                let custom = meta
                    .get("customFormat")
                    .and_then(Value::as_str)
                    .filter(|f| !f.eq_ignore_ascii_case(RFC3339));
                let output = meta
                    .get("outputFormat")
                    .and_then(Value::as_str)
                    .filter(|f| !matches!(*f, "epoch" | "epochSec" | "epochMS" | "epochNS"));

                if let Some(format) = custom.into_iter().chain(output).find(|f| !is_valid_pattern(f))
                {
                    return Err(ConfigError::InvalidTimeFormat {
                        feature: self.feature.to_string(),
                        schema: self.schema.to_string(),
                        key: key.to_string(),
                        format: format.to_string(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn targets() -> TargetConfig {
        TargetConfig::from_json(
            &json!({
                "apiConfigs": {
                    "orders": {"enabled": true, "url": "http://localhost/orders"},
                    "legacy": {"enabled": false, "url": "http://localhost/legacy"}
                },
                "kafkaConfigs": {
                    "events": {"enabled": true, "brokers": ["localhost:9092"], "topic": "events"}
                }
            })
            .to_string(),
        )
        .unwrap()
    }

    fn features(key_meta: Value, definition: Value) -> FeatureSet {
        FeatureSet::from_json(
            &json!({
                "checkout": {
                    "enabled": true,
                    "batchSize": 2,
                    "totalCount": 10,
                    "runDurationSec": 5,
                    "keyMeta": key_meta,
                    "apiSchemas": {"orders": {"enabled": true, "definition": definition}}
                }
            })
            .to_string(),
        )
        .unwrap()
    }

    fn run(set: &FeatureSet) -> Result<usize, ConfigError> {
        validate(set, &targets(), &GeneratorRegistry::new())
    }

    #[test]
    fn test_valid_feature() {
        let set = features(
            json!({
                "id": {"type": "uuid"},
                "at": {"type": "time"},
                "name": {"type": "string", "meta": {"base": "random:5"}},
                "color": {"type": "getRandomFromArray", "meta": {"val": ["red"]}},
                "source": {"rawVal": "loadtest"}
            }),
            json!({
                "id": {},
                "when": {"metaKey": "at"},
                "detail": {"type": "object", "objectMap": {"name": {}, "source": {}}},
                "items": {"type": "array", "len": 2, "arrayValues": {"objectMap": {"color": {}}}}
            }),
        );
        assert_eq!(run(&set).unwrap(), 1);
    }

    #[test]
    fn test_missing_key_meta() {
        let set = features(json!({"id": {"type": "uuid"}}), json!({"id": {}, "ghost": {}}));
        match run(&set) {
            Err(ConfigError::MissingKeyMeta {
                feature,
                schema,
                key,
                identifier,
            }) => {
                assert_eq!(feature, "checkout");
                assert_eq!(schema, "orders");
                assert_eq!(key, "ghost");
                assert_eq!(identifier, "ghost");
            }
            other => panic!("Expected MissingKeyMeta, got {other:?}"),
        }
    }

    #[test]
    fn test_alias_resolved_in_nested_scope() {
        let set = features(
            json!({"orderId": {"type": "uuid"}}),
            json!({"detail": {"type": "object", "objectMap": {"id": {"metaKey": "orderId"}}}}),
        );
        assert!(run(&set).is_ok());

        let set = features(
            json!({"orderId": {"type": "uuid"}}),
            json!({"detail": {"type": "object", "objectMap": {"id": {"metaKey": "missing"}}}}),
        );
        assert!(matches!(
            run(&set),
            Err(ConfigError::MissingKeyMeta { identifier, .. }) if identifier == "missing"
        ));
    }

    #[test]
    fn test_parameterless_kinds_ignore_meta_shape() {
        let set = features(
            json!({"id": {"type": "uuid", "meta": "unused"}, "at": {"type": "time", "meta": [1]}}),
            json!({"id": {}, "at": {}}),
        );
        assert!(run(&set).is_ok());
    }

    #[test]
    fn test_raw_value_needs_no_type() {
        let set = features(json!({"source": {"rawVal": 12}}), json!({"source": {}}));
        assert!(run(&set).is_ok());
    }

    #[test]
    fn test_type_checks() {
        let cases = [
            (json!({"x": {"meta": {}}}), "MissingType"),
            (json!({"x": {"type": "bool", "meta": {}}}), "UnknownType"),
            (json!({"x": {"type": "number"}}), "MissingMeta"),
            (json!({"x": {"type": "integer", "meta": [1, 2]}}), "MetaNotObject"),
            (json!({"x": {"type": "randomFromArray", "meta": {"val": []}}}), "EmptyCandidates"),
            (json!({"x": {"type": "time", "meta": {"outputFormat": "%Q"}}}), "InvalidTimeFormat"),
        ];

        for (key_meta, expected) in cases {
            let set = features(key_meta, json!({"x": {}}));
            let err = run(&set).unwrap_err();
            assert!(
                format!("{err:?}").starts_with(expected),
                "expected {expected}, got {err:?}"
            );
            assert!(err.to_string().contains("checkout"));
        }
    }

    #[test]
    fn test_empty_object_rejected() {
        let set = features(
            json!({"id": {"type": "uuid"}}),
            json!({"id": {}, "detail": {"type": "object", "objectMap": {}}}),
        );
        assert!(matches!(run(&set), Err(ConfigError::EmptyObject { key, .. }) if key == "detail"));

        let set = features(json!({"id": {"type": "uuid"}}), json!({}));
        assert!(matches!(run(&set), Err(ConfigError::EmptyObject { key, .. }) if key == "orders"));
    }

    #[test]
    fn test_missing_or_disabled_target() {
        let mut set = features(json!({"id": {"type": "uuid"}}), json!({"id": {}}));
        let mut feature = set.get("checkout").unwrap().clone();
        let schema = feature.api_schemas.remove("orders").unwrap();
        feature.api_schemas.insert("legacy".to_string(), schema.clone());
        set.insert("checkout", feature.clone());
        assert!(matches!(
            run(&set),
            Err(ConfigError::MissingTarget { kind: TargetKind::Api, .. })
        ));

        feature.api_schemas.clear();
        feature.stream_schemas.insert("unknown".to_string(), schema);
        set.insert("checkout", feature);
        assert!(matches!(
            run(&set),
            Err(ConfigError::MissingTarget { kind: TargetKind::Stream, .. })
        ));
    }

    #[test]
    fn test_disabled_schema_skipped() {
        let mut set = features(json!({}), json!({"ghost": {}}));
        let mut feature = set.get("checkout").unwrap().clone();
        feature.api_schemas.get_mut("orders").unwrap().enabled = false;
        set.insert("checkout", feature);
        assert_eq!(run(&set).unwrap(), 1);
    }

    #[test]
    fn test_no_enabled_features() {
        let mut set = features(json!({"id": {"type": "uuid"}}), json!({"id": {}}));
        let mut feature = set.get("checkout").unwrap().clone();
        feature.enabled = false;
        set.insert("checkout", feature);

        let err = run(&set).unwrap_err();
        assert!(matches!(err, ConfigError::NoFeatures));
        assert_eq!(err.to_string(), "no features to run");
    }

    #[test]
    fn test_zero_batch_size() {
        let mut set = features(json!({"id": {"type": "uuid"}}), json!({"id": {}}));
        let mut feature = set.get("checkout").unwrap().clone();
        feature.batch_size = 0;
        set.insert("checkout", feature);
        assert!(matches!(run(&set), Err(ConfigError::ZeroBatchSize { .. })));
    }
}
