use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::StoreError,
    extractors::AppJson,
    models::attempt::RecordAttemptRequest,
    services::{attempt_service::AttemptService, AppState},
};

/// POST /attempts - Record one answer
pub async fn record_attempt(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RecordAttemptRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let service = AttemptService::new(state.db.clone());
    let record = service.record(&req)?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /stats - Success rate per attempted question
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, StoreError> {
    let service = AttemptService::new(state.db.clone());
    Ok(Json(service.stats()?))
}

/// POST /reset - Clear all attempts, keep questions
pub async fn reset_attempts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StoreError> {
    let service = AttemptService::new(state.db.clone());
    let cleared = service.reset()?;

    Ok(Json(json!({ "success": true, "cleared": cleared })))
}
