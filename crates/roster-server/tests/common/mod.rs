//! Shared helpers for the HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use roster_graph::{
    GraphStore, IdPolicy, InMemoryGraphStore, PersonClient, PersonClientConfig, PersonRecord,
    UserDirectory,
};
use roster_server::{build_router, build_schema, AppState, SchemaContext, StatusPolicy};

/// The two people most tests look up
pub fn sample_persons() -> Vec<PersonRecord> {
    vec![
        PersonRecord::new("1", "Ada", Some("engineer")).with_activity("10", "chess"),
        PersonRecord::new("2", "Grace", None),
    ]
}

pub fn router_with(
    store: Arc<dyn GraphStore>,
    client_config: PersonClientConfig,
    status_policy: StatusPolicy,
) -> Router {
    let schema = build_schema(SchemaContext {
        persons: PersonClient::new(store, client_config),
        users: Arc::new(UserDirectory::default()),
        max_depth: 8,
    });
    build_router(AppState {
        schema,
        status_policy,
    })
}

pub fn sample_router() -> Router {
    router_with(
        Arc::new(InMemoryGraphStore::with_persons(sample_persons())),
        PersonClientConfig::default(),
        StatusPolicy::Mapped,
    )
}

pub fn rejecting_router() -> Router {
    router_with(
        Arc::new(InMemoryGraphStore::with_persons(sample_persons())),
        PersonClientConfig {
            id_policy: IdPolicy::Reject,
            ..PersonClientConfig::default()
        },
        StatusPolicy::Mapped,
    )
}

/// Form-encodes a value for use in a query string
pub fn encode(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Sends `query` to `/graphql` and returns the status and parsed body
pub async fn send_query(app: Router, method: Method, query: &str) -> (StatusCode, Value) {
    send_uri(app, method, &format!("/graphql?query={}", encode(query))).await
}

/// Sends a request to `uri` and returns the status and body, which must be JSON
pub async fn send_uri(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

pub async fn get_query(app: Router, query: &str) -> (StatusCode, Value) {
    send_query(app, Method::GET, query).await
}

/// `extensions.code` of the first error
pub fn first_code(body: &Value) -> Option<&str> {
    body.pointer("/errors/0/extensions/code").and_then(Value::as_str)
}
