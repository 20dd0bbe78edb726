// src/quiz/engine.rs

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    answer::AnswerRecord,
    error::QuizError,
    question::{PublicQuestion, Question},
    result::{SessionResult, derive_result},
};

/// Per-question countdown used when the caller does not pick one.
pub const DEFAULT_TIME_LIMIT_SECONDS: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// What a successful `submit_answer` or timing-out `tick` did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The answer was recorded and the next question is now active.
    Advanced {
        answer: AnswerRecord,
        next_index: usize,
    },
    /// The answer was the last one; the session is now terminal.
    Completed {
        answer: AnswerRecord,
        result: SessionResult,
    },
}

impl Transition {
    pub fn answer(&self) -> &AnswerRecord {
        match self {
            Transition::Advanced { answer, .. } | Transition::Completed { answer, .. } => answer,
        }
    }

    pub fn result(&self) -> Option<&SessionResult> {
        match self {
            Transition::Completed { result, .. } => Some(result),
            Transition::Advanced { .. } => None,
        }
    }
}

/// Read-only snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub current_index: usize,
    pub total_questions: usize,
    pub time_limit_seconds: u32,
    pub remaining_seconds: u32,
    /// `None` once every question has been answered.
    pub current_question: Option<PublicQuestion>,
    pub answers: Vec<AnswerRecord>,
    pub started_at: DateTime<Utc>,
    pub result: Option<SessionResult>,
}

/// State machine for a single quiz attempt.
///
/// Timing is driven from outside: the owner calls [`QuizSession::tick`] once
/// per second and passes the current instant into every mutation, so the
/// session itself owns no timers.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    time_limit_seconds: u32,
    remaining_seconds: u32,
    started_at: DateTime<Utc>,
    question_started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    status: SessionStatus,
}

impl QuizSession {
    /// Starts a new attempt over `questions`.
    ///
    /// Fails with `InvalidConfiguration` when the list is empty, the time
    /// limit is zero, a question is malformed, or question ids repeat.
    pub fn start(
        questions: Vec<Question>,
        time_limit_seconds: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::InvalidConfiguration(
                "question list is empty".to_string(),
            ));
        }
        if time_limit_seconds == 0 {
            return Err(QuizError::InvalidConfiguration(
                "time limit must be at least one second".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            question.validate()?;
            if !seen.insert(question.id) {
                return Err(QuizError::InvalidConfiguration(format!(
                    "question id {} appears more than once",
                    question.id
                )));
            }
        }

        Ok(Self {
            questions,
            current_index: 0,
            answers: Vec::new(),
            time_limit_seconds,
            remaining_seconds: time_limit_seconds,
            started_at: now,
            question_started_at: now,
            completed_at: None,
            status: SessionStatus::InProgress,
        })
    }

    /// Records the player's choice for the question at `question_index`.
    ///
    /// The index must name the active question; an index that was already
    /// answered (by a click or by a timeout) is rejected with
    /// `AlreadyAnswered` and the session is left untouched.
    pub fn submit_answer(
        &mut self,
        question_index: usize,
        selected_option_index: usize,
        now: DateTime<Utc>,
    ) -> Result<Transition, QuizError> {
        let question = self.active_question(question_index)?;

        if selected_option_index >= question.options.len() {
            return Err(QuizError::InvalidSelection {
                question_id: question.id,
                selected: selected_option_index,
                option_count: question.options.len(),
            });
        }

        let elapsed = (now - self.question_started_at).num_seconds();
        let record = AnswerRecord {
            question_id: question.id,
            selected_option_index: Some(selected_option_index),
            is_correct: question.is_correct(selected_option_index),
            time_spent_seconds: elapsed.clamp(0, i64::from(self.time_limit_seconds)) as u32,
        };

        Ok(self.record(record, now))
    }

    /// Advances the countdown by one second.
    ///
    /// Returns the timeout transition when the countdown reaches zero, `None`
    /// otherwise. A completed session ignores ticks.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Transition> {
        if self.status == SessionStatus::Completed {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        let record = AnswerRecord {
            question_id: self.questions[self.current_index].id,
            selected_option_index: None,
            is_correct: false,
            time_spent_seconds: self.time_limit_seconds,
        };
        Some(self.record(record, now))
    }

    fn active_question(&self, question_index: usize) -> Result<&Question, QuizError> {
        if question_index < self.current_index || self.status == SessionStatus::Completed {
            return Err(QuizError::AlreadyAnswered(question_index));
        }
        if question_index > self.current_index {
            return Err(QuizError::QuestionNotActive(question_index));
        }
        Ok(&self.questions[self.current_index])
    }

    fn record(&mut self, answer: AnswerRecord, now: DateTime<Utc>) -> Transition {
        self.answers.push(answer.clone());
        self.current_index += 1;

        if self.current_index < self.questions.len() {
            self.remaining_seconds = self.time_limit_seconds;
            self.question_started_at = now;
            return Transition::Advanced {
                answer,
                next_index: self.current_index,
            };
        }

        self.status = SessionStatus::Completed;
        self.remaining_seconds = 0;
        self.completed_at = Some(now);

        let result = self.derive(now);
        Transition::Completed { answer, result }
    }

    fn derive(&self, completed_at: DateTime<Utc>) -> SessionResult {
        let total_time = (completed_at - self.started_at).num_seconds().max(0) as u64;
        derive_result(&self.answers, self.questions.len(), total_time)
    }

    /// The final summary, once the session has completed.
    pub fn result(&self) -> Option<SessionResult> {
        self.completed_at.map(|at| self.derive(at))
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            status: self.status,
            current_index: self.current_index,
            total_questions: self.questions.len(),
            time_limit_seconds: self.time_limit_seconds,
            remaining_seconds: self.remaining_seconds,
            current_question: self.questions.get(self.current_index).map(PublicQuestion::from),
            answers: self.answers.clone(),
            started_at: self.started_at,
            result: self.result(),
        }
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + TimeDelta::seconds(seconds)
    }

    fn question(id: i64, correct: usize) -> Question {
        Question {
            id,
            prompt: format!("Question {}", id),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_option_index: correct,
            explanation: Some("Because.".to_string()),
        }
    }

    fn three_questions() -> Vec<Question> {
        vec![question(11, 0), question(12, 1), question(13, 2)]
    }

    fn tick_n(session: &mut QuizSession, n: u32, now: DateTime<Utc>) -> Option<Transition> {
        let mut last = None;
        for _ in 0..n {
            if let Some(t) = session.tick(now) {
                last = Some(t);
            }
        }
        last
    }

    #[test]
    fn test_start_initial_state() {
        let session = QuizSession::start(three_questions(), 10, at(0)).unwrap();

        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.remaining_seconds(), 10);
        assert!(session.answers().is_empty());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_start_rejects_empty_question_list() {
        let err = QuizSession::start(Vec::new(), 10, at(0)).unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_start_rejects_zero_time_limit() {
        let err = QuizSession::start(three_questions(), 0, at(0)).unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_start_rejects_duplicate_ids() {
        let err = QuizSession::start(vec![question(1, 0), question(1, 2)], 10, at(0)).unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_start_rejects_broken_answer_key() {
        let err = QuizSession::start(vec![question(1, 9)], 10, at(0)).unwrap_err();
        assert!(matches!(err, QuizError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_mixed_session_scenario() {
        let mut session = QuizSession::start(three_questions(), 10, at(0)).unwrap();

        // Q1 correct after 2s.
        let t1 = session.submit_answer(0, 0, at(2)).unwrap();
        assert!(matches!(t1, Transition::Advanced { next_index: 1, .. }));

        // Q2 wrong after 5s.
        session.submit_answer(1, 3, at(7)).unwrap();
        assert_eq!(session.remaining_seconds(), 10);

        // Q3 runs out.
        let last = tick_n(&mut session, 10, at(17)).unwrap();
        let result = last.result().unwrap().clone();

        let summary: Vec<(Option<usize>, bool, u32)> = result
            .answers
            .iter()
            .map(|a| (a.selected_option_index, a.is_correct, a.time_spent_seconds))
            .collect();
        assert_eq!(
            summary,
            vec![(Some(0), true, 2), (Some(3), false, 5), (None, false, 10)]
        );
        assert_eq!(result.correct_count, 1);
        assert!((result.score_percentage - 33.33).abs() < 0.01);
        assert_eq!(result.total_time_spent_seconds, 17);
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn test_timeout_records_sentinel_answer() {
        let mut session = QuizSession::start(three_questions(), 5, at(0)).unwrap();

        assert!(tick_n(&mut session, 4, at(4)).is_none());
        assert_eq!(session.remaining_seconds(), 1);

        let transition = session.tick(at(5)).unwrap();
        let answer = transition.answer();
        assert_eq!(answer.question_id, 11);
        assert!(answer.timed_out());
        assert!(!answer.is_correct);
        assert_eq!(answer.time_spent_seconds, 5);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.remaining_seconds(), 5);
    }

    #[test]
    fn test_out_of_range_selection_leaves_state_unchanged() {
        let mut session = QuizSession::start(three_questions(), 10, at(0)).unwrap();

        let err = session.submit_answer(0, 5, at(1)).unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidSelection {
                question_id: 11,
                selected: 5,
                option_count: 4
            }
        );
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_double_submit_records_once() {
        let mut session = QuizSession::start(three_questions(), 10, at(0)).unwrap();

        session.submit_answer(0, 1, at(1)).unwrap();
        let err = session.submit_answer(0, 0, at(1)).unwrap_err();

        assert_eq!(err, QuizError::AlreadyAnswered(0));
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_submit_for_future_question_is_rejected() {
        let mut session = QuizSession::start(three_questions(), 10, at(0)).unwrap();

        let err = session.submit_answer(2, 0, at(1)).unwrap_err();
        assert_eq!(err, QuizError::QuestionNotActive(2));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_timeout_then_late_click_counts_once() {
        let mut session = QuizSession::start(three_questions(), 3, at(0)).unwrap();

        // Timeout wins the race for question 0.
        tick_n(&mut session, 3, at(3)).unwrap();
        let err = session.submit_answer(0, 0, at(3)).unwrap_err();

        assert_eq!(err, QuizError::AlreadyAnswered(0));
        assert_eq!(session.answers().len(), 1);
        assert!(session.answers()[0].timed_out());
    }

    #[test]
    fn test_click_then_late_tick_counts_once() {
        let mut session = QuizSession::start(three_questions(), 3, at(0)).unwrap();

        tick_n(&mut session, 2, at(2));
        session.submit_answer(0, 0, at(2)).unwrap();
        // The tick that would have timed out question 0 now counts for question 1.
        assert!(session.tick(at(3)).is_none());

        assert_eq!(session.answers().len(), 1);
        assert!(session.answers()[0].is_correct);
        assert_eq!(session.remaining_seconds(), 2);
    }

    #[test]
    fn test_every_question_answered_once_in_order() {
        let questions: Vec<Question> = (1..=6).map(|id| question(id, 0)).collect();
        let mut session = QuizSession::start(questions, 2, at(0)).unwrap();

        let mut clock = 0;
        while session.status() == SessionStatus::InProgress {
            clock += 1;
            if session.current_index() % 2 == 0 {
                let index = session.current_index();
                session.submit_answer(index, 1, at(clock)).unwrap();
            } else {
                session.tick(at(clock));
            }
        }

        let ids: Vec<i64> = session.answers().iter().map(|a| a.question_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert!(session.tick(at(clock + 1)).is_none());
        assert_eq!(session.answers().len(), 6);
    }

    #[test]
    fn test_all_correct_scores_hundred() {
        let mut session = QuizSession::start(three_questions(), 10, at(0)).unwrap();

        session.submit_answer(0, 0, at(1)).unwrap();
        session.submit_answer(1, 1, at(2)).unwrap();
        let last = session.submit_answer(2, 2, at(3)).unwrap();

        let result = last.result().unwrap();
        assert_eq!(result.score_percentage, 100.0);
        assert!(result.wrong_answer_indices.is_empty());
        assert_eq!(session.result().as_ref(), Some(result));
    }

    #[test]
    fn test_time_spent_is_clamped() {
        let mut session = QuizSession::start(three_questions(), 10, at(0)).unwrap();

        // Clock went backwards.
        session.submit_answer(0, 0, at(-3)).unwrap();
        // Answer arrives long after the limit without ticks in between.
        session.submit_answer(1, 1, at(60)).unwrap();

        assert_eq!(session.answers()[0].time_spent_seconds, 0);
        assert_eq!(session.answers()[1].time_spent_seconds, 10);
    }

    #[test]
    fn test_completed_session_rejects_submissions() {
        let mut session = QuizSession::start(vec![question(1, 0)], 10, at(0)).unwrap();
        session.submit_answer(0, 0, at(1)).unwrap();

        assert_eq!(
            session.submit_answer(1, 0, at(2)).unwrap_err(),
            QuizError::AlreadyAnswered(1)
        );
    }

    #[test]
    fn test_view_hides_answer_key_and_tracks_progress() {
        let mut session = QuizSession::start(three_questions(), 10, at(0)).unwrap();
        session.submit_answer(0, 0, at(1)).unwrap();

        let view = session.view();
        assert_eq!(view.current_index, 1);
        assert_eq!(view.answers.len(), 1);
        assert_eq!(view.current_question.as_ref().unwrap().id, 12);
        assert!(view.result.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["current_question"].get("correct_option_index").is_none());
        assert_eq!(json["status"], "in_progress");
    }
}
