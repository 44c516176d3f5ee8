use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Answer {
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|path| !path.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub tags: Vec<String>,
    pub answers: Vec<Answer>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn has_correct_answer(&self) -> bool {
        self.answers.iter().any(|a| a.is_correct)
    }
}

/// Element of the bulk-insert array.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewQuestion {
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_answers"))]
    pub answers: Vec<Answer>,
}

/// Full replacement of a question's content.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_answers"))]
    pub answers: Vec<Answer>,
}

fn validate_answers(answers: &[Answer]) -> Result<(), ValidationError> {
    if answers.iter().any(|a| a.is_correct) {
        Ok(())
    } else {
        let mut err = ValidationError::new("no_correct_answer");
        err.message = Some("At least one answer must be marked correct".into());
        Err(err)
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ListQuestionsQuery {
    /// Substring matched against the stored tag list
    pub tag: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkInsertResponse {
    pub success: bool,
    pub count: usize,
    pub ids: Vec<String>,
}

/// Content problems surfaced by `GET /questions/audit`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContentAudit {
    pub missing_images: Vec<MissingImage>,
    pub without_correct_answer: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MissingImage {
    pub question_id: String,
    pub answer_label: String,
    pub is_correct: bool,
}
