// src/quiz/error.rs

/// Errors raised by the quiz session engine.
///
/// None of these leave a session half-updated: a rejected call returns the
/// error and the session is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// Malformed start parameters (empty question list, zero time limit,
    /// broken question records).
    #[error("Invalid quiz configuration: {0}")]
    InvalidConfiguration(String),

    /// The selected option does not exist on the current question.
    #[error(
        "Option {selected} is out of range for question {question_id} ({option_count} options)"
    )]
    InvalidSelection {
        question_id: i64,
        selected: usize,
        option_count: usize,
    },

    /// The question at this index already has an answer record.
    #[error("Question {0} has already been answered")]
    AlreadyAnswered(usize),

    /// The question at this index has not been reached yet.
    #[error("Question {0} is not the active question")]
    QuestionNotActive(usize),
}
