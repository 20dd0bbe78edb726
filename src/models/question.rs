// src/models/question.rs

use serde::Deserialize;
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::{error::AppError, quiz::Question};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,

    pub quiz_set_id: String,

    /// Ordering inside the quiz set.
    pub position: i64,

    pub prompt: String,

    /// List of options (e.g., ["Option A", "Option B"]).
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// Index into `options` of the correct choice.
    pub correct_option_index: i64,

    pub explanation: Option<String>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let correct_option_index = usize::try_from(row.correct_option_index).map_err(|_| {
            AppError::InternalServerError(format!(
                "question {} has a negative answer key",
                row.id
            ))
        })?;

        Ok(Question {
            id: row.id,
            prompt: row.prompt,
            options: row.options.0,
            correct_option_index,
            explanation: row.explanation,
        })
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub quiz_set_id: String,
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_option_index: usize,
    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
}

impl CreateQuestionRequest {
    /// Cross-field check the derive cannot express.
    pub fn answer_key_in_range(&self) -> bool {
        self.correct_option_index < self.options.len()
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < crate::quiz::question::MIN_OPTIONS {
        return Err(validator::ValidationError::new("options_too_few"));
    }
    for opt in options {
        if opt.trim().is_empty() {
            return Err(validator::ValidationError::new("option_empty"));
        }
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}
