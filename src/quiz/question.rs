// src/quiz/question.rs

use serde::{Deserialize, Serialize};

use super::error::QuizError;

/// Minimum number of choices a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// A single multiple-choice question as supplied by the catalog.
///
/// Immutable for the lifetime of a session; option order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: Option<String>,
}

impl Question {
    /// Checks the record invariants: at least two options and an answer key
    /// that points inside them.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.options.len() < MIN_OPTIONS {
            return Err(QuizError::InvalidConfiguration(format!(
                "question {} needs at least {} options, got {}",
                self.id,
                MIN_OPTIONS,
                self.options.len()
            )));
        }
        if self.correct_option_index >= self.options.len() {
            return Err(QuizError::InvalidConfiguration(format!(
                "question {} has answer key {} but only {} options",
                self.id,
                self.correct_option_index,
                self.options.len()
            )));
        }
        Ok(())
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option_index
    }
}

/// Question as shown to the player (no answer key, no explanation).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            prompt: q.prompt.clone(),
            options: q.options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: usize) -> Question {
        Question {
            id: 7,
            prompt: "Pick one".to_string(),
            options: (0..options).map(|i| format!("Option {}", i)).collect(),
            correct_option_index: correct,
            explanation: None,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_question() {
        assert!(question(4, 3).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_single_option() {
        let err = question(1, 0).validate().unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_validate_rejects_answer_key_out_of_range() {
        let err = question(4, 4).validate().unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_public_question_hides_answer_key() {
        let json = serde_json::to_value(PublicQuestion::from(&question(3, 1))).unwrap();
        assert!(json.get("correct_option_index").is_none());
        assert!(json.get("explanation").is_none());
        assert_eq!(json["options"].as_array().unwrap().len(), 3);
    }
}
