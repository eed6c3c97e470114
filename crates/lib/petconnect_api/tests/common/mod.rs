//! Shared fixtures: an in-memory app plus request helpers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use petconnect_api::config::ApiConfig;
use petconnect_api::{AppState, router};
use petconnect_core::files::FileStore;
use petconnect_core::store::MemoryStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    /// Keeps the upload directory alive for the test.
    pub upload_dir: TempDir,
}

pub async fn test_app() -> TestApp {
    test_app_with(|_| {}).await
}

pub async fn test_app_with(tweak: impl FnOnce(&mut ApiConfig)) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let mut config = ApiConfig::new("integration-test-secret");
    config.bcrypt_cost = 4;
    config.upload_dir = upload_dir.path().to_path_buf();
    tweak(&mut config);

    let files = FileStore::open(&config.upload_dir).await.expect("upload dir");
    let state = AppState::new(config, Arc::new(MemoryStore::new()), files);
    TestApp {
        app: router(state.clone()),
        state,
        upload_dir,
    }
}

impl TestApp {
    /// Send a request and return status plus the body parsed as JSON
    /// (`Value::Null` for empty or non-JSON bodies).
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.expect("request");
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, token, None)).await
    }

    /// Register and return `(token, user)`.
    pub async fn register(&self, username: &str) -> (String, Value) {
        let (status, json) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "correct-horse",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register {username}: {json}");
        let token = json["token"].as_str().expect("token").to_string();
        (token, json["user"].clone())
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn pet_body(name: &str, species: &str) -> Value {
    json!({
        "name": name,
        "species": species,
        "breed": "Mixed",
        "birthDate": "2020-04-01",
        "description": "Friendly",
        "isActive": true,
    })
}
