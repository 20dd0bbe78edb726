// src/live/mod.rs

//! In-memory driver for running quiz sessions.
//!
//! Owns the per-session mutex and the once-per-second ticker; hands finished
//! results to a [`ResultSink`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{error::AppError, quiz::SessionResult};

pub mod registry;

pub use registry::SessionRegistry;

/// Who is playing and what they are playing; copied into history on completion.
#[derive(Debug, Clone)]
pub struct SessionMeta {
    pub user_id: i64,
    pub quiz_set_id: Option<String>,
    pub title: String,
    pub category: String,
    pub sub_category: String,
    pub genre: String,
}

/// A finished session on its way to the history store.
#[derive(Debug, Clone)]
pub struct CompletedSession {
    pub session_id: Uuid,
    pub meta: SessionMeta,
    pub result: SessionResult,
    pub completed_at: DateTime<Utc>,
}

/// Destination for completed sessions.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn record(&self, completed: &CompletedSession) -> Result<(), AppError>;
}
