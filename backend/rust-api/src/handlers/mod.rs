use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut dependencies = serde_json::Map::new();

    let sqlite_health = check_sqlite(&state);
    let healthy = sqlite_health.get("status").and_then(|v| v.as_str()) == Some("healthy");
    dependencies.insert("sqlite".to_string(), json!(sqlite_health));

    let (status_code, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "sparky-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": dependencies
        })),
    )
}

fn check_sqlite(state: &AppState) -> serde_json::Map<String, serde_json::Value> {
    let mut result = serde_json::Map::new();

    match state.db.ping() {
        Ok(()) => {
            result.insert("status".to_string(), json!("healthy"));
            result.insert("message".to_string(), json!("SQLite connection successful"));
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(format!("SQLite error: {}", e)));
        }
    }

    result
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

pub mod attempts;
pub mod questions;
