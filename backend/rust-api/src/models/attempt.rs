use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAttemptRequest {
    pub question_id: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: i64,
    pub question_id: String,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate over all attempts of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub question_id: String,
    pub question: String,
    pub total_attempts: u64,
    pub correct_count: u64,
    pub success_rate: f64,
}

impl QuestionStats {
    pub fn new(question_id: String, question: String, total: u64, correct: u64) -> Self {
        let success_rate = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        };
        Self {
            question_id,
            question,
            total_attempts: total,
            correct_count: correct,
            success_rate,
        }
    }
}
