// src/quiz/result.rs

use serde::{Deserialize, Serialize};

use super::answer::AnswerRecord;

/// Immutable summary of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub total_questions: usize,
    pub correct_count: usize,
    /// `correct_count / total_questions * 100`, unrounded.
    pub score_percentage: f64,
    /// Positions (not question ids) of correctly answered questions.
    pub correct_answer_indices: Vec<usize>,
    pub wrong_answer_indices: Vec<usize>,
    pub answers: Vec<AnswerRecord>,
    pub total_time_spent_seconds: u64,
}

impl SessionResult {
    /// Percentage as displayed to players.
    pub fn rounded_score(&self) -> u32 {
        self.score_percentage.round() as u32
    }

    pub fn is_perfect(&self) -> bool {
        self.correct_count == self.total_questions
    }
}

/// Derives the result summary from the captured answers.
///
/// Total for any input; a zero question count yields a zero score.
pub fn derive_result(
    answers: &[AnswerRecord],
    total_questions: usize,
    total_time_spent_seconds: u64,
) -> SessionResult {
    let mut correct_answer_indices = Vec::new();
    let mut wrong_answer_indices = Vec::new();

    for (index, answer) in answers.iter().enumerate() {
        if answer.is_correct {
            correct_answer_indices.push(index);
        } else {
            wrong_answer_indices.push(index);
        }
    }

    let correct_count = correct_answer_indices.len();
    let score_percentage = if total_questions == 0 {
        0.0
    } else {
        (correct_count as f64 / total_questions as f64) * 100.0
    };

    SessionResult {
        total_questions,
        correct_count,
        score_percentage,
        correct_answer_indices,
        wrong_answer_indices,
        answers: answers.to_vec(),
        total_time_spent_seconds,
    }
}

/// One finished attempt as seen by the history statistics.
#[derive(Debug, Clone, Copy)]
pub struct ScoreSample {
    pub score_percentage: f64,
    pub total_questions: usize,
    pub total_time_spent_seconds: u64,
}

/// Aggregate figures over a player's attempts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    pub attempts: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub average_seconds_per_question: f64,
}

impl HistoryStats {
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = ScoreSample>,
    {
        let mut stats = HistoryStats::default();
        let mut score_sum = 0.0;
        let mut question_sum = 0usize;
        let mut seconds_sum = 0u64;

        for sample in samples {
            stats.attempts += 1;
            score_sum += sample.score_percentage;
            stats.best_score = stats.best_score.max(sample.score_percentage);
            question_sum += sample.total_questions;
            seconds_sum += sample.total_time_spent_seconds;
        }

        if stats.attempts > 0 {
            stats.average_score = score_sum / stats.attempts as f64;
        }
        if question_sum > 0 {
            stats.average_seconds_per_question = seconds_sum as f64 / question_sum as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: i64, is_correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_id: id,
            selected_option_index: Some(0),
            is_correct,
            time_spent_seconds: 3,
        }
    }

    #[test]
    fn test_derive_result_partitions_positions() {
        let answers = vec![answer(10, true), answer(20, false), answer(30, true)];
        let result = derive_result(&answers, 3, 9);

        assert_eq!(result.correct_count, 2);
        assert_eq!(result.correct_answer_indices, vec![0, 2]);
        assert_eq!(result.wrong_answer_indices, vec![1]);
        assert_eq!(result.rounded_score(), 67);
        assert_eq!(result.total_time_spent_seconds, 9);
    }

    #[test]
    fn test_derive_result_perfect() {
        let answers = vec![answer(1, true), answer(2, true)];
        let result = derive_result(&answers, 2, 4);

        assert_eq!(result.score_percentage, 100.0);
        assert!(result.is_perfect());
        assert!(result.wrong_answer_indices.is_empty());
    }

    #[test]
    fn test_derive_result_zero() {
        let answers = vec![answer(1, false)];
        let result = derive_result(&answers, 1, 10);

        assert_eq!(result.score_percentage, 0.0);
        assert_eq!(result.wrong_answer_indices, vec![0]);
    }

    #[test]
    fn test_derive_result_without_questions_is_total() {
        let result = derive_result(&[], 0, 0);
        assert_eq!(result.score_percentage, 0.0);
    }

    #[test]
    fn test_history_stats() {
        let stats = HistoryStats::from_samples([
            ScoreSample {
                score_percentage: 50.0,
                total_questions: 4,
                total_time_spent_seconds: 20,
            },
            ScoreSample {
                score_percentage: 100.0,
                total_questions: 2,
                total_time_spent_seconds: 4,
            },
        ]);

        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.average_score, 75.0);
        assert_eq!(stats.best_score, 100.0);
        assert_eq!(stats.average_seconds_per_question, 4.0);
    }

    #[test]
    fn test_history_stats_empty() {
        assert_eq!(HistoryStats::from_samples([]), HistoryStats::default());
    }
}
