use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    config::{COMPLETED_SESSION_RETENTION_SECS, Config},
    live::SessionRegistry,
    store::HistoryStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub history: HistoryStore,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Wires the history store in as the destination of finished sessions.
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let history = HistoryStore::new(pool.clone());
        let sessions = SessionRegistry::new(
            Arc::new(history.clone()),
            Duration::from_millis(config.tick_interval_ms),
            Duration::from_secs(COMPLETED_SESSION_RETENTION_SECS),
        );

        Self {
            pool,
            config,
            history,
            sessions,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for HistoryStore {
    fn from_ref(state: &AppState) -> Self {
        state.history.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
