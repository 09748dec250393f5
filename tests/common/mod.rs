#![allow(dead_code)]

use mint_cannabis::{
    config::{AppConfig, SyncConfig},
    db::{self, DbConfig},
    events::Event,
    AppState,
};
use tokio::sync::mpsc;

/// Application state over a private in-memory SQLite database.
///
/// Events are kept in the channel so tests can inspect what was published.
pub struct TestApp {
    pub state: AppState,
    events: mpsc::Receiver<Event>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_sync(SyncConfig::default()).await
    }

    pub async fn with_sync(sync: SyncConfig) -> Self {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory())
            .await
            .expect("failed to open in-memory database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let mut config = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        config.sync = sync;
        let (state, events) = AppState::with_connection(config, pool);

        Self { state, events }
    }

    /// Events published since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}
