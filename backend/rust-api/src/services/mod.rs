use crate::config::Config;
use crate::db::Db;

pub struct AppState {
    pub db: Db,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        tracing::info!("Opening question store...");

        let db = Db::open(config)?;
        db.ping()?;

        tracing::info!("Question store ready");

        Ok(Self { db })
    }
}

pub mod attempt_service;
pub mod game_store;
pub mod question_client;
pub mod question_service;
pub mod quiz_round;
pub mod state_storage;
