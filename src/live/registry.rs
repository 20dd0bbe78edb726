// src/live/registry.rs

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use uuid::Uuid;

use super::{CompletedSession, ResultSink, SessionMeta};
use crate::{
    error::AppError,
    models::session::AnswerFeedback,
    quiz::{QuizSession, SessionStatus, SessionView, Transition},
};

struct LiveSession {
    meta: SessionMeta,
    engine: QuizSession,
    ticker: Option<JoinHandle<()>>,
}

/// Registry entry. The owner is kept outside the lock so lookups never wait
/// on a busy session.
struct SessionHandle {
    owner: i64,
    state: Mutex<LiveSession>,
}

/// All running (and recently finished) sessions of this process.
///
/// Each session sits behind its own mutex, which serialises player answers
/// against ticker timeouts: whichever takes the lock first records the
/// answer, the other sees the question as already answered.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<SessionHandle>>>>,
    sink: Arc<dyn ResultSink>,
    tick_interval: Duration,
    retention: Duration,
}

impl SessionRegistry {
    pub fn new(sink: Arc<dyn ResultSink>, tick_interval: Duration, retention: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            sink,
            tick_interval,
            retention,
        }
    }

    /// Registers a freshly started engine and begins its countdown.
    pub async fn start(&self, meta: SessionMeta, engine: QuizSession) -> (Uuid, SessionView) {
        let id = Uuid::new_v4();
        let view = engine.view();
        let owner = meta.user_id;

        let handle = Arc::new(SessionHandle {
            owner,
            state: Mutex::new(LiveSession {
                meta,
                engine,
                ticker: None,
            }),
        });

        self.sessions.write().await.insert(id, handle.clone());
        let ticker = self.spawn_ticker(id, handle.clone());
        handle.state.lock().await.ticker = Some(ticker);

        tracing::info!(
            session_id = %id,
            user_id = owner,
            questions = view.total_questions,
            "Quiz session started"
        );
        (id, view)
    }

    pub async fn view(&self, id: Uuid, user_id: i64) -> Result<SessionView, AppError> {
        let handle = self.lookup(id, user_id).await?;
        let guard = handle.state.lock().await;
        Ok(guard.engine.view())
    }

    /// Answers the question at `question_index` on behalf of the player.
    pub async fn submit(
        &self,
        id: Uuid,
        user_id: i64,
        question_index: usize,
        selected_option_index: usize,
    ) -> Result<AnswerFeedback, AppError> {
        let handle = self.lookup(id, user_id).await?;

        let (feedback, completed) = {
            let mut guard = handle.state.lock().await;
            let now = Utc::now();

            let transition = guard
                .engine
                .submit_answer(question_index, selected_option_index, now)
                .map_err(|e| {
                    tracing::debug!(session_id = %id, "Answer rejected: {}", e);
                    AppError::from(e)
                })?;

            let (correct_option_index, explanation) = match guard.engine.question(question_index) {
                Some(q) => (q.correct_option_index, q.explanation.clone()),
                None => {
                    return Err(AppError::InternalServerError(format!(
                        "answered question {} is missing from session {}",
                        question_index, id
                    )));
                }
            };

            let completed = completion(id, &guard.meta, &transition, now);
            let feedback = AnswerFeedback {
                answer: transition.answer().clone(),
                correct_option_index,
                explanation,
                session: guard.engine.view(),
            };
            (feedback, completed)
        };

        if let Some(completed) = completed {
            self.persist(completed).await;
        }
        Ok(feedback)
    }

    /// Discards a session. Nothing is written to history for an unfinished one.
    pub async fn abandon(&self, id: Uuid, user_id: i64) -> Result<(), AppError> {
        let removed = {
            let mut sessions = self.sessions.write().await;
            let owned = matches!(sessions.get(&id), Some(handle) if handle.owner == user_id);
            if !owned {
                return Err(not_found());
            }
            sessions.remove(&id)
        };

        if let Some(handle) = removed {
            let mut guard = handle.state.lock().await;
            // A completed session's ticker may still be writing history.
            if guard.engine.status() == SessionStatus::InProgress {
                if let Some(ticker) = guard.ticker.take() {
                    ticker.abort();
                }
                tracing::info!(session_id = %id, "Quiz session abandoned");
            }
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn lookup(&self, id: Uuid, user_id: i64) -> Result<Arc<SessionHandle>, AppError> {
        let sessions = self.sessions.read().await;
        match sessions.get(&id) {
            Some(handle) if handle.owner == user_id => Ok(handle.clone()),
            _ => Err(not_found()),
        }
    }

    /// Hands the result to the sink from a detached task, so a dropped
    /// request cannot cancel the write halfway.
    async fn persist(&self, completed: CompletedSession) {
        let sink = self.sink.clone();
        let task = tokio::spawn(async move {
            match sink.record(&completed).await {
                Ok(()) => tracing::info!(
                    session_id = %completed.session_id,
                    score = completed.result.rounded_score(),
                    perfect = completed.result.is_perfect(),
                    "Quiz session completed"
                ),
                Err(e) => tracing::error!(
                    "Failed to record result of session {}: {}",
                    completed.session_id,
                    e
                ),
            }
        });

        if let Err(e) = task.await {
            tracing::error!("Result writer task failed: {}", e);
        }
    }

    fn spawn_ticker(&self, id: Uuid, handle: Arc<SessionHandle>) -> JoinHandle<()> {
        let registry = self.clone();

        tokio::spawn(async move {
            let period = registry.tick_interval;
            let mut interval = time::interval_at(Instant::now() + period, period);
            // A stalled task must not burn several seconds of countdown at once.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let completed = {
                    let mut guard = handle.state.lock().await;
                    if guard.engine.status() == SessionStatus::Completed {
                        break;
                    }

                    let now = Utc::now();
                    match guard.engine.tick(now) {
                        Some(transition) => {
                            tracing::debug!(
                                session_id = %id,
                                question_id = transition.answer().question_id,
                                "Question timed out"
                            );
                            completion(id, &guard.meta, &transition, now)
                        }
                        None => None,
                    }
                };

                if let Some(completed) = completed {
                    registry.persist(completed).await;
                    break;
                }
            }

            // Keep the finished session readable for a while, then forget it.
            time::sleep(registry.retention).await;
            registry.sessions.write().await.remove(&id);
            tracing::debug!(session_id = %id, "Quiz session evicted");
        })
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Quiz session not found".to_string())
}

fn completion(
    session_id: Uuid,
    meta: &SessionMeta,
    transition: &Transition,
    now: DateTime<Utc>,
) -> Option<CompletedSession> {
    transition.result().map(|result| CompletedSession {
        session_id,
        meta: meta.clone(),
        result: result.clone(),
        completed_at: now,
    })
}
