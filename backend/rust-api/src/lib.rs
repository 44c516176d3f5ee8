use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::StoreError;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The game runs in the browser on another origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .merge(question_routes())
        .route("/attempts", post(handlers::attempts::record_attempt))
        .route("/stats", get(handlers::attempts::get_stats))
        .route("/reset", post(handlers::attempts::reset_attempts))
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(middlewares::trace::trace_context_middleware))
        .layer(middleware::from_fn(middlewares::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

fn question_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/questions",
            get(handlers::questions::list_questions)
                .post(handlers::questions::create_questions)
                .delete(handlers::questions::delete_all_questions),
        )
        .route("/questions/audit", get(handlers::questions::audit_questions))
        .route(
            "/questions/{id}",
            put(handlers::questions::update_question).delete(handlers::questions::delete_question),
        )
}
