//! Configuration loading and validation through the driver.

use std::fs;
use std::path::PathBuf;
use stressity::{validate_config, ConfigPaths};
use tempfile::TempDir;

fn demo_paths() -> ConfigPaths {
    ConfigPaths {
        config: PathBuf::from("demos/config.json"),
        schemas: PathBuf::from("demos/schemas.json"),
    }
}

#[test]
fn test_demo_configuration_is_valid() {
    let config = demo_paths().load().unwrap();
    let enabled = tokio_test::assert_ok!(validate_config(&config));
    assert_eq!(enabled, 1);
}

#[test]
fn test_invalid_schema_names_feature_and_key() {
    let dir = TempDir::new().unwrap();
    let schemas = dir.path().join("schemas.json");
    fs::write(
        &schemas,
        r#"{
            "signup": {
                "enabled": true, "batchSize": 1, "totalCount": 1, "runDurationSec": 1,
                "keyMeta": {"email": {"type": "string", "meta": {"base": "random"}}},
                "apiSchemas": {"orders": {"enabled": true, "definition": {"email": {}, "name": {}}}}
            }
        }"#,
    )
    .unwrap();

    let paths = ConfigPaths {
        schemas,
        ..demo_paths()
    };
    let config = paths.load().unwrap();
    let err = validate_config(&config).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("signup"), "{message}");
    assert!(message.contains("orders"), "{message}");
    assert!(message.contains("name"), "{message}");
}

#[test]
fn test_missing_file_reports_path() {
    let paths = ConfigPaths {
        config: PathBuf::from("does/not/exist.json"),
        ..demo_paths()
    };
    let err = paths.load().unwrap_err();
    assert!(format!("{err:#}").contains("does/not/exist.json"));
}

#[test]
fn test_unknown_node_type_rejected_at_load() {
    let dir = TempDir::new().unwrap();
    let schemas = dir.path().join("schemas.json");
    fs::write(
        &schemas,
        r#"{"f": {"enabled": true, "apiSchemas": {"orders": {"enabled": true,
            "definition": {"x": {"type": "map", "objectMap": {}}}}}}}"#,
    )
    .unwrap();

    let paths = ConfigPaths {
        schemas,
        ..demo_paths()
    };
    assert!(paths.load().is_err());
}
