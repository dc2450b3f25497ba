//! End-to-end tests for the record store, the request router and table provisioning
//!
//! These tests cover:
//! - POST/GET round trips through the router
//! - Status codes for malformed bodies, unknown ids and unsupported methods
//! - Provisioning a table, waiting for it and tearing it down
//!
//! Everything except `test_live_dynamodb_round_trip` runs against `InMemoryBackend`.
//!
//! # Live test
//!
//! `test_live_dynamodb_round_trip` talks to a real DynamoDB endpoint and is ignored by
//! default. Set the following environment variables in your `.env` file:
//!
//! ```text
//! AWS_ACCESS_KEY_ID=your_access_key
//! AWS_SECRET_ACCESS_KEY=your_secret_key
//! AWS_REGION=your_preferred_region
//! ```
//!
//! For local testing with DynamoDB Local, you can use dummy values and set:
//!
//! ```text
//! AWS_ENDPOINT_URL=http://localhost:8000
//! ```
//!
//! Then run:
//!
//! ```text
//! cargo test -- --ignored
//! ```
//!
//! Note: The live test may incur AWS charges if run against a real DynamoDB instance.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::config::Config;
use crate::dynamodb::{Backend, DynamoDb, InMemoryBackend, RawError};
use crate::error::ErrorKind;
use crate::lifecycle::{EnsureOutcome, TableLifecycleManager};
use crate::model::{Record, RecordInput};
use crate::router::{route, ApiRequest, ApiResponse};
use crate::store::RecordStore;

const TEST_TABLE_NAME: &str = "test-gamer-profiles";

fn store_with_table() -> (Arc<InMemoryBackend>, RecordStore) {
    let backend = Arc::new(InMemoryBackend::with_table(&RecordStore::table_descriptor(
        TEST_TABLE_NAME,
    )));
    let store = RecordStore::new(backend.clone(), TEST_TABLE_NAME);
    (backend, store)
}

fn post(body: &str) -> ApiRequest {
    ApiRequest {
        method: "POST".to_string(),
        body: body.to_string(),
        ..Default::default()
    }
}

fn get(id: &str) -> ApiRequest {
    ApiRequest {
        method: "GET".to_string(),
        path_parameters: HashMap::from([("id".to_string(), id.to_string())]),
        ..Default::default()
    }
}

fn body_json(response: &ApiResponse) -> Value {
    serde_json::from_str(&response.body).unwrap()
}

#[tokio::test]
#[instrument]
async fn test_post_then_get_round_trip() {
    let (_, store) = store_with_table();
    let now = chrono::Utc::now().timestamp();

    let created = route(&store, &post(r#"{"name":"Ada","attribute":"chess"}"#)).await;
    assert_eq!(created.status_code, 201);

    let body = body_json(&created);
    let id = body["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!((body["createdAt"].as_i64().unwrap() - now).abs() <= 1);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["attribute"], "chess");
    assert_eq!(body["phoneNumber"], "");

    info!(%id, "fetching created record");
    let fetched = route(&store, &get(&id)).await;
    assert_eq!(fetched.status_code, 200);
    assert_eq!(body_json(&fetched), body);
}

#[tokio::test]
async fn test_create_then_get_returns_same_record() {
    let (_, store) = store_with_table();
    let inputs = [
        RecordInput::default(),
        RecordInput {
            name: Some("Grace".into()),
            phone_number: Some("+1 555 0100".into()),
            attribute: Some("go".into()),
        },
        RecordInput {
            name: Some("Ünïcödé ✓".into()),
            phone_number: None,
            attribute: Some(String::new()),
        },
    ];

    for input in inputs {
        let created = store.create(input).await.unwrap();
        let fetched: Option<Record> = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }
}

#[tokio::test]
async fn test_get_unknown_id_is_absent() {
    let (_, store) = store_with_table();

    assert_eq!(store.get("never-written").await.unwrap(), None);

    let response = route(&store, &get("never-written")).await;
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn test_post_unparseable_body_is_bad_request() {
    let (backend, store) = store_with_table();

    for body in ["", "{", "not json", r#"{"name": ["Ada"]}"#] {
        let response = route(&store, &post(body)).await;
        assert_eq!(response.status_code, 400, "{body:?}");
    }
    assert_eq!(backend.item_count(TEST_TABLE_NAME).await, 0);
}

#[tokio::test]
async fn test_unsupported_methods_are_bad_request() {
    let (_, store) = store_with_table();

    for method in ["DELETE", "PUT", "PATCH", "post", "get", ""] {
        let request = ApiRequest {
            method: method.to_string(),
            ..Default::default()
        };
        assert_eq!(route(&store, &request).await.status_code, 400, "{method}");
    }
}

#[tokio::test]
async fn test_get_without_id_is_bad_request() {
    let (_, store) = store_with_table();
    let request = ApiRequest {
        method: "GET".to_string(),
        ..Default::default()
    };

    assert_eq!(route(&store, &request).await.status_code, 400);
}

#[tokio::test]
async fn test_store_failures_are_generic_server_errors() {
    let (backend, store) = store_with_table();

    backend
        .fail_next(RawError::service(
            "ProvisionedThroughputExceededException",
            "secret internal detail",
        ))
        .await;
    let response = route(&store, &post(r#"{"name":"Ada"}"#)).await;
    assert_eq!(response.status_code, 500);
    assert!(!response.body.contains("secret internal detail"));

    backend
        .fail_next(RawError::transport("dns error: no such host"))
        .await;
    let response = route(&store, &get("anything")).await;
    assert_eq!(response.status_code, 500);
    assert!(!response.body.contains("dns"));
}

#[tokio::test(start_paused = true)]
async fn test_table_lifecycle() {
    let backend = Arc::new(InMemoryBackend::new().with_activation_polls(4));
    let manager = TableLifecycleManager::new(backend.clone());
    let table = RecordStore::table_descriptor(TEST_TABLE_NAME);

    assert_eq!(manager.ensure_table(&table).await.unwrap(), EnsureOutcome::Created);
    manager
        .await_ready(
            TEST_TABLE_NAME,
            Duration::from_secs(5),
            Duration::from_secs(120),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let store = RecordStore::new(backend.clone(), TEST_TABLE_NAME);
    let record = store.create(RecordInput::default()).await.unwrap();

    assert_eq!(
        manager.ensure_table(&table).await.unwrap(),
        EnsureOutcome::AlreadyExists
    );
    assert_eq!(store.get(&record.id).await.unwrap(), Some(record));

    manager.delete_table(TEST_TABLE_NAME).await.unwrap();
    let err = manager.delete_table(TEST_TABLE_NAME).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
#[ignore = "requires DynamoDB credentials or a DynamoDB Local endpoint"]
async fn test_live_dynamodb_round_trip() -> anyhow::Result<()> {
    let config = Config {
        table_name: TEST_TABLE_NAME.to_string(),
        ..Config::from_env()?
    };
    let backend: Arc<dyn Backend> = Arc::new(DynamoDb::connect(&config).await);
    let manager = TableLifecycleManager::new(backend.clone());

    manager.ensure_table(&config.table_descriptor()).await?;
    manager
        .await_ready(
            TEST_TABLE_NAME,
            config.poll_interval,
            config.ready_timeout,
            &CancellationToken::new(),
        )
        .await?;

    let store = RecordStore::new(backend, TEST_TABLE_NAME);
    let created = store
        .create(RecordInput {
            name: Some("Ada".into()),
            attribute: Some("chess".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(store.get(&created.id).await?, Some(created));

    manager.delete_table(TEST_TABLE_NAME).await?;
    Ok(())
}
