use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::db::Db;
use crate::error::{StoreError, StoreResult};
use crate::metrics::{self, track_db_operation};
use crate::models::attempt::{AttemptRecord, QuestionStats, RecordAttemptRequest};

pub struct AttemptService {
    db: Db,
}

impl AttemptService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn record(&self, req: &RecordAttemptRequest) -> StoreResult<AttemptRecord> {
        let record = track_db_operation("record_attempt", || {
            self.db.with_conn(|conn| {
                let exists = conn
                    .query_row(
                        "SELECT 1 FROM questions WHERE id = ?1",
                        params![req.question_id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some();
                if !exists {
                    return Err(StoreError::NotFound("Question".into()));
                }

                let timestamp = Utc::now();
                conn.execute(
                    "INSERT INTO attempts (question_id, is_correct, timestamp) VALUES (?1, ?2, ?3)",
                    params![req.question_id, req.is_correct, timestamp.to_rfc3339()],
                )?;

                Ok(AttemptRecord {
                    id: conn.last_insert_rowid(),
                    question_id: req.question_id.clone(),
                    is_correct: req.is_correct,
                    timestamp,
                })
            })
        })?;

        metrics::record_attempt(record.is_correct);
        tracing::debug!(
            "Attempt recorded: question={}, correct={}",
            record.question_id,
            record.is_correct
        );
        Ok(record)
    }

    /// Per-question totals, only for questions that have been attempted.
    pub fn stats(&self) -> StoreResult<Vec<QuestionStats>> {
        track_db_operation("question_stats", || {
            self.db.with_conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT q.id, q.question, COUNT(a.id), COALESCE(SUM(a.is_correct), 0)
                     FROM questions q
                     JOIN attempts a ON a.question_id = q.id
                     GROUP BY q.id, q.question
                     ORDER BY q.id",
                )?;
                let rows = stmt.query_map([], |row| {
                    let total: i64 = row.get(2)?;
                    let correct: i64 = row.get(3)?;
                    Ok(QuestionStats::new(
                        row.get(0)?,
                        row.get(1)?,
                        total.max(0) as u64,
                        correct.max(0) as u64,
                    ))
                })?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
        })
    }

    /// Clears every attempt; questions stay. Returns the number removed.
    pub fn reset(&self) -> StoreResult<usize> {
        let cleared = track_db_operation("reset_attempts", || {
            self.db
                .with_conn(|conn| Ok(conn.execute("DELETE FROM attempts", [])?))
        })?;

        tracing::info!("Cleared {} attempts", cleared);
        Ok(cleared)
    }
}
