// src/models/history.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::quiz::{AnswerRecord, ScoreSample};

/// Represents the 'quiz_history' table in the database.
/// One row per completed quiz session.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryRecord {
    /// Same id as the live session that produced it.
    pub id: String,
    pub user_id: i64,
    pub quiz_set_id: Option<String>,
    pub quiz_set_title: String,
    pub category: String,
    pub sub_category: String,
    pub genre: String,
    /// Percentage, 0 to 100.
    pub score: f64,
    pub correct_count: i64,
    pub total_questions: i64,
    pub total_time_spent_seconds: i64,
    pub answers: Json<Vec<AnswerRecord>>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl HistoryRecord {
    pub fn sample(&self) -> ScoreSample {
        ScoreSample {
            score_percentage: self.score,
            total_questions: self.total_questions.max(0) as usize,
            total_time_spent_seconds: self.total_time_spent_seconds.max(0) as u64,
        }
    }
}

/// Query parameters for listing history.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryFilter {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub genre: Option<String>,
}
