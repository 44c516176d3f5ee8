#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use sparky_api::{config::Config, create_router, services::AppState};

pub fn create_test_state() -> Arc<AppState> {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    Arc::new(AppState::new(&Config::in_memory()).expect("Failed to initialize test app state"))
}

pub fn create_test_app() -> Router {
    create_router(create_test_state())
}

pub fn question_json(id: Option<&str>, tags: &[&str]) -> Value {
    let mut q = json!({
        "question": "Welke planeet heeft ringen?",
        "tags": tags,
        "answers": [
            { "id": "a", "label": "Saturnus", "isCorrect": true, "image": "/assets/saturn.png" },
            { "id": "b", "label": "Mercurius", "isCorrect": false }
        ]
    });
    if let Some(id) = id {
        q["id"] = json!(id);
    }
    q
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
