//! SQLite access for the question store.
//!
//! A single connection guarded by a mutex: every request takes the lock for
//! one statement or one transaction, which serializes writers.

mod schema;

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{StoreError, StoreResult};

#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let db = if config.is_in_memory() {
            Self::open_in_memory()?
        } else {
            let path = Path::new(&config.database_path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            info!("Opening SQLite database at {}", path.display());
            Self::from_connection(Connection::open(path)?)?
        };

        let created = db.with_conn(schema::init_schema)?;
        if created && config.seed_sample {
            db.with_conn(schema::seed_sample_question)?;
        }

        Ok(db)
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> StoreResult<Self> {
        debug!("Opening in-memory SQLite database");
        let db = Self::from_connection(Connection::open_in_memory()?)?;
        db.with_conn(schema::init_schema)?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&conn)
    }

    /// Exclusive access for operations that open a transaction.
    pub fn with_conn_mut<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut conn)
    }

    pub fn ping(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
            debug_assert_eq!(one, 1);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_database_answers_ping() {
        let db = Db::open_in_memory().unwrap();
        assert!(db.ping().is_ok());
    }

    #[test]
    fn file_database_is_seeded_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            database_path: dir.path().join("nested/sparky.db").to_string_lossy().into_owned(),
            host: "127.0.0.1".into(),
            port: 0,
            seed_sample: true,
        };

        let count = |db: &Db| {
            db.with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get::<_, i64>(0))?)
            })
            .unwrap()
        };

        let db = Db::open(&config).unwrap();
        assert_eq!(count(&db), 1);
        db.with_conn(|conn| Ok(conn.execute("DELETE FROM questions", [])?))
            .unwrap();
        drop(db);

        let db = Db::open(&config).unwrap();
        assert_eq!(count(&db), 0);
    }
}
