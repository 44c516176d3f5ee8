use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{params, types::Type, ErrorCode, Row};
use validator::Validate;

use crate::db::Db;
use crate::error::{StoreError, StoreResult};
use crate::metrics::{track_db_operation, QUESTIONS_IMPORTED_TOTAL};
use crate::models::question::{
    Answer, ContentAudit, ListQuestionsQuery, MissingImage, NewQuestion, Question,
    UpdateQuestionRequest,
};

const SELECT_QUESTION: &str = "SELECT id, question, tags, answers, created_at FROM questions";

pub struct QuestionService {
    db: Db,
}

impl QuestionService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Questions in random order, optionally filtered and capped.
    ///
    /// A question matches when any one of its tags contains `tag`.
    pub fn list(&self, query: &ListQuestionsQuery) -> StoreResult<Vec<Question>> {
        let tag = query.tag.as_deref().filter(|t| !t.is_empty());
        let limit = query.limit.map(i64::from).unwrap_or(-1);

        track_db_operation("list_questions", || {
            self.db.with_conn(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE (?1 IS NULL OR EXISTS (
                         SELECT 1 FROM json_each(questions.tags) WHERE instr(json_each.value, ?1) > 0
                     ))
                     ORDER BY RANDOM() LIMIT ?2",
                    SELECT_QUESTION
                ))?;
                let rows = stmt.query_map(params![tag, limit], question_from_row)?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
        })
    }

    /// Inserts the whole batch in one transaction and returns the stored ids.
    pub fn bulk_insert(&self, questions: Vec<NewQuestion>) -> StoreResult<Vec<String>> {
        for (index, q) in questions.iter().enumerate() {
            q.validate().map_err(|e| {
                StoreError::Validation(format!("Question at index {}: {}", index, e))
            })?;
        }

        let ids = track_db_operation("bulk_insert_questions", || {
            self.db.with_conn_mut(|conn| {
                let tx = conn.transaction()?;
                let now = Utc::now().to_rfc3339();
                let mut ids = Vec::with_capacity(questions.len());
                {
                    let mut insert = tx.prepare(
                        "INSERT INTO questions (id, question, tags, answers, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    )?;
                    for q in &questions {
                        let id = q
                            .id
                            .clone()
                            .filter(|id| !id.trim().is_empty())
                            .unwrap_or_else(generate_question_id);
                        insert
                            .execute(params![
                                id,
                                q.question,
                                serde_json::to_string(&q.tags)?,
                                serde_json::to_string(&q.answers)?,
                                now,
                            ])
                            .map_err(|e| duplicate_id_to_validation(e, &id))?;
                        ids.push(id);
                    }
                }
                tx.commit()?;
                Ok(ids)
            })
        })?;

        QUESTIONS_IMPORTED_TOTAL.inc_by(ids.len() as u64);
        tracing::info!("Imported {} questions", ids.len());
        Ok(ids)
    }

    pub fn update(&self, id: &str, req: &UpdateQuestionRequest) -> StoreResult<()> {
        req.validate()?;

        track_db_operation("update_question", || {
            self.db.with_conn(|conn| {
                let changed = conn.execute(
                    "UPDATE questions SET question = ?1, tags = ?2, answers = ?3 WHERE id = ?4",
                    params![
                        req.question,
                        serde_json::to_string(&req.tags)?,
                        serde_json::to_string(&req.answers)?,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(StoreError::NotFound("Question".into()));
                }
                Ok(())
            })
        })
    }

    /// Removes a question together with its attempts.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        track_db_operation("delete_question", || {
            self.db.with_conn_mut(|conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM attempts WHERE question_id = ?1", params![id])?;
                let deleted = tx.execute("DELETE FROM questions WHERE id = ?1", params![id])?;
                if deleted == 0 {
                    return Err(StoreError::NotFound("Question".into()));
                }
                tx.commit()?;
                Ok(())
            })
        })
    }

    /// Removes every question and every attempt. Returns the number of questions removed.
    pub fn delete_all(&self) -> StoreResult<usize> {
        let deleted = track_db_operation("delete_all_questions", || {
            self.db.with_conn_mut(|conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM attempts", [])?;
                let deleted = tx.execute("DELETE FROM questions", [])?;
                tx.commit()?;
                Ok(deleted)
            })
        })?;

        tracing::warn!("Deleted all {} questions", deleted);
        Ok(deleted)
    }

    /// Answers without artwork and questions nobody can answer correctly.
    pub fn audit(&self) -> StoreResult<ContentAudit> {
        let questions = track_db_operation("audit_questions", || {
            self.db.with_conn(|conn| {
                let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_QUESTION))?;
                let rows = stmt.query_map([], question_from_row)?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
        })?;

        let mut audit = ContentAudit::default();
        for q in &questions {
            if !q.has_correct_answer() {
                audit.without_correct_answer.push(q.id.clone());
            }
            audit.missing_images.extend(
                q.answers
                    .iter()
                    .filter(|a| !a.has_image())
                    .map(|a| MissingImage {
                        question_id: q.id.clone(),
                        answer_label: a.label.clone(),
                        is_correct: a.is_correct,
                    }),
            );
        }
        Ok(audit)
    }
}

/// `q-<unix millis>-<9 base36 chars>`
pub fn generate_question_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| std::char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("q-{}-{}", Utc::now().timestamp_millis(), suffix)
}

fn duplicate_id_to_validation(err: rusqlite::Error, id: &str) -> StoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => {
            StoreError::Validation(format!("Duplicate question id: {}", id))
        }
        _ => StoreError::Database(err),
    }
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    let tags: String = row.get(2)?;
    let answers: String = row.get(3)?;
    let created_at: String = row.get(4)?;

    Ok(Question {
        id: row.get(0)?,
        question: row.get(1)?,
        tags: parse_json_column::<Vec<String>>(2, &tags)?,
        answers: parse_json_column::<Vec<Answer>>(3, &answers)?,
        created_at: parse_timestamp(4, &created_at)?,
    })
}

fn parse_json_column<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    let raw = if raw.trim().is_empty() { "[]" } else { raw };
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
