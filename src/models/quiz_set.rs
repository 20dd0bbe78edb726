// src/models/quiz_set.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::quiz::PublicQuestion;

/// Represents the 'quiz_sets' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizSet {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Top level grouping, e.g. 'general' or 'specialized'.
    pub category: String,
    pub sub_category: String,
    pub genre: String,

    /// 'beginner', 'intermediate' or 'advanced'.
    pub difficulty: String,

    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Quiz set listing row, joined with its question count.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSetSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub sub_category: String,
    pub genre: String,
    pub difficulty: String,
    pub question_count: i64,
}

/// DTO for returning a quiz set with its (answer-free) questions.
#[derive(Debug, Serialize)]
pub struct QuizSetDetail {
    #[serde(flatten)]
    pub set: QuizSet,
    pub questions: Vec<PublicQuestion>,
}

/// Query parameters for listing quiz sets.
#[derive(Debug, Default, Deserialize)]
pub struct QuizSetFilter {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub genre: Option<String>,
}

/// Shape of `data/quiz_sets.json`.
#[derive(Debug, Deserialize)]
pub struct SeedQuizSet {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub sub_category: String,
    pub genre: String,
    pub difficulty: String,
    pub created_by: String,
    pub questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct SeedQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: Option<String>,
}
