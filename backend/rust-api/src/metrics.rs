use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

use crate::error::{StoreError, StoreResult};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Database Metrics (SQLite)
    pub static ref DB_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "db_operations_total",
        "Total number of question store operations",
        &["operation", "status"]
    )
    .unwrap();

    pub static ref DB_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "db_operation_duration_seconds",
        "Question store operation duration in seconds",
        &["operation"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25]
    )
    .unwrap();

    // Business Metrics
    pub static ref QUESTIONS_IMPORTED_TOTAL: IntCounter = register_int_counter!(
        "questions_imported_total",
        "Total number of questions inserted through bulk import"
    )
    .unwrap();

    pub static ref ATTEMPTS_RECORDED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "attempts_recorded_total",
        "Total number of answer attempts recorded",
        &["correct"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: time a store operation and count it by outcome
pub fn track_db_operation<F, T>(operation: &str, f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T>,
{
    let start = std::time::Instant::now();
    let result = f();
    let duration = start.elapsed().as_secs_f64();

    let status = match &result {
        Ok(_) => "success",
        Err(StoreError::Validation(_)) | Err(StoreError::NotFound(_)) => "rejected",
        Err(_) => "error",
    };

    DB_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    DB_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

pub fn record_attempt(correct: bool) {
    let label = if correct { "true" } else { "false" };
    ATTEMPTS_RECORDED_TOTAL.with_label_values(&[label]).inc();
}
