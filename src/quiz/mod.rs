// src/quiz/mod.rs

//! Quiz session engine and result aggregation.
//!
//! Pure state and arithmetic: nothing in here performs I/O or owns a timer.

pub mod answer;
pub mod engine;
pub mod error;
pub mod question;
pub mod result;

pub use answer::{AnswerRecord, TIMEOUT_SENTINEL};
pub use engine::{DEFAULT_TIME_LIMIT_SECONDS, QuizSession, SessionStatus, SessionView, Transition};
pub use error::QuizError;
pub use question::{PublicQuestion, Question};
pub use result::{HistoryStats, ScoreSample, SessionResult, derive_result};
