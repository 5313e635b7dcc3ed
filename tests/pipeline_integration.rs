//! End-to-end pipeline tests against real temporary directories
//!
//! HTTP goes through `MockTransport`, so nothing here needs a live service.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use apiguide::acquire::StrategyKind;
use apiguide::config::GuideConfig;
use apiguide::pipeline::{PipelineOrchestrator, RunOptions, ValidationMode};
use apiguide::transport::MockTransport;
use serde_json::{json, Value};
use tempfile::TempDir;

fn config() -> GuideConfig {
    GuideConfig {
        openapi_url: "http://svc.test/openapi.json".to_string(),
        ..GuideConfig::default()
    }
}

fn run(root: &Path, transport: Arc<MockTransport>, options: RunOptions) -> apiguide::RunReport {
    PipelineOrchestrator::for_project(root, &config(), transport)
        .unwrap()
        .execute(&root.display().to_string(), options)
        .unwrap()
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn items_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {"title": "Inventory", "version": "2.1.0"},
        "servers": [{"url": "http://svc.test"}],
        "paths": {
            "/items/{id}": {
                "get": {
                    "summary": "Fetch one item",
                    "operationId": "getItem",
                    "tags": ["items"],
                    "security": [{"bearer": []}],
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
                    ],
                    "responses": {
                        "200": {
                            "description": "The item",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "id": {"type": "integer", "example": 123},
                                            "status": {"type": "string", "enum": ["active", "archived"]}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/health": {"get": {"summary": "Liveness"}}
        },
        "components": {
            "schemas": {
                "Item": {"type": "object", "properties": {"id": {"type": "integer"}}}
            },
            "securitySchemes": {"bearer": {"type": "http", "scheme": "bearer"}}
        }
    })
}

fn remote_transport() -> Arc<MockTransport> {
    let transport = Arc::new(MockTransport::new());
    transport.add_json("http://svc.test/openapi.json", &items_document());
    transport
}

#[test]
fn test_remote_description_wins() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.py"), "@app.post(\"/login\")\n").unwrap();

    let report = run(dir.path(), remote_transport(), RunOptions::default());

    assert_eq!(report.source, StrategyKind::Remote);
    assert_eq!(report.detail, "http://svc.test/openapi.json");
    assert_eq!(report.endpoint_count, 2);
    assert_eq!(report.schema_count, 1);
    assert_eq!(
        read(dir.path(), "docs/report.txt"),
        "Description source: remote (http://svc.test/openapi.json)\n"
    );
    assert!(!read(dir.path(), "docs/endpoints.csv").contains("/login"));
}

#[test]
fn test_authenticated_endpoint_artifacts() {
    let dir = TempDir::new().unwrap();
    run(dir.path(), remote_transport(), RunOptions::default());

    let guide = read(dir.path(), "API_GUIDE.md");
    assert!(guide.starts_with("# Inventory"));
    assert!(guide.contains("> Requires authentication"));
    assert!(guide.contains("\"id\": 123"));
    assert!(guide.contains("\"status\": \"active\""));
    assert!(guide.contains("Authorization: Bearer <token>"));

    let sample = read(dir.path(), "docs/examples/GET__items_id_.md");
    assert!(sample.contains("-H \"Authorization: Bearer <token>\""));
    assert!(sample.contains("http://svc.test/items/{id}"));

    let health = read(dir.path(), "docs/examples/GET__health.md");
    assert!(!health.contains("Authorization"));

    let schema: Value = serde_json::from_str(&read(dir.path(), "docs/schemas/Item.json")).unwrap();
    assert_eq!(schema["type"], "object");

    let collection: Value =
        serde_json::from_str(&read(dir.path(), "docs/postman_collection.json")).unwrap();
    assert_eq!(collection["info"]["name"], "Inventory Collection");
    assert_eq!(collection["item"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_index_has_one_row_per_operation() {
    let dir = TempDir::new().unwrap();
    run(dir.path(), remote_transport(), RunOptions::default());

    let index = read(dir.path(), "docs/endpoints.csv");
    let rows: Vec<&str> = index.lines().collect();
    assert_eq!(rows[0], "method,path,operationId,tags,summary");
    assert_eq!(rows.len(), 3);
    assert!(rows.contains(&"GET,/items/{id},getItem,items,Fetch one item"));
}

#[test]
fn test_static_fallback_when_remote_unreachable() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("api")).unwrap();
    fs::write(
        dir.path().join("api/routes.js"),
        "router.post('/login', handler);\nrouter.get('/me', handler);\n",
    )
    .unwrap();

    let report = run(
        dir.path(),
        Arc::new(MockTransport::new()),
        RunOptions::default(),
    );

    assert_eq!(report.source, StrategyKind::Static);
    assert_eq!(report.title, "Static Scan (Fallback)");
    assert_eq!(report.endpoint_count, 2);
    assert!(read(dir.path(), "API_GUIDE.md").contains("### POST `/login`"));
    assert!(dir.path().join("docs/examples/POST__login.md").is_file());
    assert_eq!(
        read(dir.path(), "docs/report.txt"),
        "Description source: static (fallback)\n"
    );
}

#[test]
fn test_static_scan_of_empty_project() {
    let dir = TempDir::new().unwrap();

    let report = run(
        dir.path(),
        Arc::new(MockTransport::new()),
        RunOptions {
            preferred: StrategyKind::Static,
            ..RunOptions::default()
        },
    );

    assert_eq!(report.source, StrategyKind::Static);
    assert_eq!(report.endpoint_count, 0);
    assert_eq!(
        read(dir.path(), "docs/endpoints.csv"),
        "method,path,operationId,tags,summary\n"
    );
}

#[test]
fn test_sample_validation_probes_safe_endpoints() {
    let dir = TempDir::new().unwrap();
    let transport = remote_transport();
    transport.add_json("http://svc.test/health", &json!({"ok": true}));

    let report = run(
        dir.path(),
        transport.clone(),
        RunOptions {
            validation: ValidationMode::Sample,
            ..RunOptions::default()
        },
    );

    let probes = report.validation.unwrap();
    assert_eq!(probes.len(), 1);
    assert_eq!(probes[0].to_string(), "GET /health -> 200");
    assert!(read(dir.path(), "docs/report.txt").ends_with("Validation:\nGET /health -> 200\n"));
    assert!(transport
        .requests()
        .contains(&"http://svc.test/health".to_string()));
}

#[test]
fn test_reruns_are_byte_identical() {
    let dir = TempDir::new().unwrap();

    run(dir.path(), remote_transport(), RunOptions::default());
    let guide = read(dir.path(), "API_GUIDE.md");
    let index = read(dir.path(), "docs/endpoints.csv");
    let collection = read(dir.path(), "docs/postman_collection.json");

    run(dir.path(), remote_transport(), RunOptions::default());
    assert_eq!(read(dir.path(), "API_GUIDE.md"), guide);
    assert_eq!(read(dir.path(), "docs/endpoints.csv"), index);
    assert_eq!(read(dir.path(), "docs/postman_collection.json"), collection);
}
