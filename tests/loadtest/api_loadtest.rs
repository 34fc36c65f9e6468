//! Full run against an in-process HTTP target.

use crate::server;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use stressity::{run_load_test, write_report, ConfigPaths};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn write_config(dir: &TempDir, url: &str) -> ConfigPaths {
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        format!(
            r#"{{
                "apiConfigs": {{
                    "orders": {{"enabled": true, "url": "{url}", "numClients": 2, "pipelineFactor": 2}}
                }}
            }}"#
        ),
    )
    .unwrap();

    let schemas = dir.path().join("schemas.json");
    fs::write(
        &schemas,
        r#"{
            "checkout": {
                "enabled": true,
                "batchSize": 4,
                "batchIntervalMs": 0,
                "runDurationSec": 30,
                "totalCount": 10,
                "seed": 7,
                "keyMeta": {
                    "id": {"type": "uuid"},
                    "qty": {"type": "integer", "meta": {"min": 1, "max": 5}},
                    "channel": {"rawVal": "web"}
                },
                "apiSchemas": {
                    "orders": {"enabled": true, "definition": {
                        "id": {},
                        "channel": {},
                        "lines": {"type": "array", "len": 2, "arrayValues": {"objectMap": {"qty": {}}}}
                    }}
                }
            }
        }"#,
    )
    .unwrap();

    ConfigPaths { config, schemas }
}

#[tokio::test]
async fn test_run_delivers_every_unit() {
    let server = server::start("/orders").await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.url).load().unwrap();

    let report = run_load_test(&config, CancellationToken::new())
        .await
        .unwrap();

    assert!(report.all_completed());
    let feature = &report.features[0];
    assert_eq!(feature.units_produced, 10);
    assert_eq!(feature.batches, 3);
    assert_eq!(feature.items_attempted, 10);
    assert_eq!(feature.items_failed, 0);

    let bodies = server.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 10);
    for body in &bodies {
        let payload: Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["channel"], "web");
        let lines = payload["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
        assert!(payload["id"].as_str().is_some());
    }

    let report_path: PathBuf = dir.path().join("report.json");
    write_report(&report_path, &report).unwrap();
    let written: Value = serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(written["features"][0]["name"], "checkout");
    assert_eq!(written["features"][0]["state"], "completed");
    assert_eq!(written["features"][0]["units_produced"], 10);
}

#[tokio::test]
async fn test_unreachable_target_still_produces() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/orders", listener.local_addr().unwrap());
    drop(listener);

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &url).load().unwrap();

    let report = run_load_test(&config, CancellationToken::new())
        .await
        .unwrap();
    let feature = &report.features[0];
    assert_eq!(feature.units_produced, 10);
    assert_eq!(feature.items_failed, 10);
}

#[tokio::test]
async fn test_invalid_config_fails_before_run() {
    let server = server::start("/orders").await;
    let dir = TempDir::new().unwrap();
    let mut config = write_config(&dir, &server.url).load().unwrap();
    let mut checkout = config.features.get("checkout").unwrap().clone();
    checkout.batch_size = 0;
    config.features.insert("checkout", checkout);

    let err = run_load_test(&config, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Configuration is invalid"));
    assert!(server.bodies.lock().unwrap().is_empty());
}
