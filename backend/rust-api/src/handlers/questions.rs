use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::StoreError,
    extractors::{AppJson, AppQuery},
    models::question::{BulkInsertResponse, ListQuestionsQuery, NewQuestion, UpdateQuestionRequest},
    services::{question_service::QuestionService, AppState},
};

/// GET /questions?tag=&limit= - Random selection, optionally filtered
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListQuestionsQuery>,
) -> Result<impl IntoResponse, StoreError> {
    let service = QuestionService::new(state.db.clone());
    let questions = service.list(&query)?;

    tracing::debug!(
        "Listed {} questions (tag={:?}, limit={:?})",
        questions.len(),
        query.tag,
        query.limit
    );

    Ok(Json(questions))
}

/// POST /questions - Bulk insert, all or nothing
pub async fn create_questions(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, StoreError> {
    if !body.is_array() {
        return Err(StoreError::Validation("Input must be an array".into()));
    }

    let questions: Vec<NewQuestion> = serde_json::from_value(body)
        .map_err(|e| StoreError::Validation(format!("Invalid question payload: {}", e)))?;

    let service = QuestionService::new(state.db.clone());
    let ids = service.bulk_insert(questions)?;

    Ok((
        StatusCode::CREATED,
        Json(BulkInsertResponse {
            success: true,
            count: ids.len(),
            ids,
        }),
    ))
}

/// PUT /questions/:id - Replace prompt, tags and answers
pub async fn update_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let service = QuestionService::new(state.db.clone());
    service.update(&id, &req)?;

    tracing::info!("Question updated: {}", id);
    Ok(Json(json!({ "success": true })))
}

/// DELETE /questions/:id - Remove one question and its attempts
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StoreError> {
    let service = QuestionService::new(state.db.clone());
    service.delete(&id)?;

    tracing::info!("Question deleted: {}", id);
    Ok(Json(json!({ "success": true })))
}

/// DELETE /questions - Remove everything
pub async fn delete_all_questions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StoreError> {
    let service = QuestionService::new(state.db.clone());
    let deleted = service.delete_all()?;

    Ok(Json(json!({ "success": true, "deleted": deleted })))
}

/// GET /questions/audit - Content completeness report
pub async fn audit_questions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StoreError> {
    let service = QuestionService::new(state.db.clone());
    Ok(Json(service.audit()?))
}
