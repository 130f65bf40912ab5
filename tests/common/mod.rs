//! Shared helpers for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bukutamu_server::{
    api,
    config::{AdminConfig, AppConfig, ExportConfig, SheetsConfig},
    repository::storage::{KeyValueStore, MemoryStore},
    services::greeting::Greeter,
    AppState,
};

/// `admin:secret`
pub const ADMIN_AUTH: &str = "Basic YWRtaW46c2VjcmV0";
/// `admin:wrong`
pub const WRONG_AUTH: &str = "Basic YWRtaW46d3Jvbmc=";

/// Greeter that answers without any network call
pub struct StaticGreeter;

#[async_trait]
impl Greeter for StaticGreeter {
    async fn greet(&self, name: &str, _purpose: &str) -> String {
        format!("Halo {}", name)
    }
}

pub fn test_config(script_url: &str) -> AppConfig {
    AppConfig {
        admin: AdminConfig {
            username: "admin".to_string(),
            password: "secret".to_string(),
        },
        sheets: SheetsConfig {
            default_script_url: script_url.to_string(),
            timeout_secs: Some(5),
            ..SheetsConfig::default()
        },
        export: ExportConfig {
            utc_offset_minutes: 0,
        },
        ..AppConfig::default()
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<dyn KeyValueStore>,
    pub router: Router,
}

pub fn spawn_app(script_url: &str) -> TestApp {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = AppState::new(test_config(script_url), store.clone(), Arc::new(StaticGreeter))
        .expect("app state");
    TestApp {
        router: api::router(state.clone()),
        state,
        store,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        (status, headers, body.to_vec())
    }

    pub async fn json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, body) = self.send(request).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, value)
    }
}

pub fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn send_json(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn empty(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).expect("request")
}
