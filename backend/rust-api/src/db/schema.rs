use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::json;
use tracing::info;

use crate::error::StoreResult;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS questions (
        id TEXT PRIMARY KEY,
        question TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        answers TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS attempts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id TEXT NOT NULL,
        is_correct INTEGER NOT NULL,
        timestamp TEXT NOT NULL,
        FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_attempts_question ON attempts(question_id);
";

/// Creates the tables. Returns `true` when the questions table did not exist yet.
pub fn init_schema(conn: &Connection) -> StoreResult<bool> {
    let existed: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'questions')",
        [],
        |row| row.get(0),
    )?;

    conn.execute_batch(SCHEMA)?;

    if !existed {
        info!("Created questions and attempts tables");
    }

    Ok(!existed)
}

/// Inserts the starter question so a fresh install has something to play.
pub fn seed_sample_question(conn: &Connection) -> StoreResult<()> {
    let answers = json!([
        { "id": "a", "label": "Aarde", "isCorrect": false },
        { "id": "b", "label": "Jupiter", "isCorrect": true },
        { "id": "c", "label": "Mars", "isCorrect": false }
    ]);

    conn.execute(
        "INSERT OR IGNORE INTO questions (id, question, tags, answers, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            "sample-1",
            "Welke planeet is het grootst?",
            json!(["level1", "space"]).to_string(),
            answers.to_string(),
            Utc::now().to_rfc3339(),
        ],
    )?;

    info!("Seeded sample question");
    Ok(())
}
