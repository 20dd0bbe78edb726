// src/models/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::quiz::{AnswerRecord, SessionView};

/// DTO for starting a quiz session.
///
/// Either `quiz_set_id` or `genre` picks the questions; `count` only applies
/// to genre draws.
#[derive(Debug, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[validate(length(min = 1, max = 100))]
    pub quiz_set_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub genre: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub count: Option<u32>,
    #[validate(range(min = 1, max = 600))]
    pub time_limit_seconds: Option<u32>,
}

/// DTO for answering the active question.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// Index of the question the player is answering.
    pub question_index: usize,
    pub selected_option_index: usize,
}

/// Returned when a session is created.
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub quiz_set_title: String,
    pub session: SessionView,
}

/// Returned after an answer is accepted: the verdict plus the new state.
#[derive(Debug, Serialize)]
pub struct AnswerFeedback {
    pub answer: AnswerRecord,
    pub correct_option_index: usize,
    pub explanation: Option<String>,
    pub session: SessionView,
}
