// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{Config, DEFAULT_GENRE_QUESTION_COUNT},
    error::AppError,
    live::{SessionMeta, SessionRegistry},
    models::{
        question::QuestionRow,
        quiz_set::{QuizSetDetail, QuizSetFilter},
        session::{StartSessionRequest, StartSessionResponse, SubmitAnswerRequest},
    },
    quiz::{PublicQuestion, Question, QuizSession},
    store::catalog,
    utils::jwt::Claims,
};

/// Lists quiz sets, optionally filtered by category, sub-category and genre.
pub async fn list_quiz_sets(
    State(pool): State<SqlitePool>,
    Query(filter): Query<QuizSetFilter>,
) -> Result<impl IntoResponse, AppError> {
    let sets = catalog::list_quiz_sets(&pool, &filter).await?;
    Ok(Json(sets))
}

/// Returns a quiz set with its questions. Answer keys are not included.
pub async fn get_quiz_set(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let set = catalog::get_quiz_set(&pool, &id)
        .await?
        .ok_or(AppError::NotFound("Quiz set not found".to_string()))?;

    let questions = to_questions(catalog::questions_for_set(&pool, &id).await?)?;

    Ok(Json(QuizSetDetail {
        set,
        questions: questions.iter().map(PublicQuestion::from).collect(),
    }))
}

/// Starts a timed quiz session.
///
/// * `quiz_set_id` plays a whole set in order.
/// * `genre` plays `count` random questions of that genre.
/// * `time_limit_seconds` overrides the configured per-question limit.
pub async fn start_session(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let user_id = claims.user_id()?;

    let (meta, rows) = match (&req.quiz_set_id, &req.genre) {
        (Some(quiz_set_id), _) => {
            let set = catalog::get_quiz_set(&pool, quiz_set_id)
                .await?
                .ok_or(AppError::NotFound("Quiz set not found".to_string()))?;
            let rows = catalog::questions_for_set(&pool, quiz_set_id).await?;
            let meta = SessionMeta {
                user_id,
                quiz_set_id: Some(set.id),
                title: set.title,
                category: set.category,
                sub_category: set.sub_category,
                genre: set.genre,
            };
            (meta, rows)
        }
        (None, Some(genre)) => {
            let (category, sub_category) = catalog::genre_labels(&pool, genre)
                .await?
                .ok_or(AppError::NotFound(format!("Genre '{}' not found", genre)))?;
            let count = req.count.unwrap_or(DEFAULT_GENRE_QUESTION_COUNT);
            let rows = catalog::random_questions_for_genre(&pool, genre, count).await?;
            let meta = SessionMeta {
                user_id,
                quiz_set_id: None,
                title: format!("Random {} quiz", genre),
                category,
                sub_category,
                genre: genre.clone(),
            };
            (meta, rows)
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either quiz_set_id or genre is required".to_string(),
            ));
        }
    };

    let questions = to_questions(rows)?;
    let time_limit = req.time_limit_seconds.unwrap_or(config.question_time_limit);
    let engine = QuizSession::start(questions, time_limit, Utc::now())?;

    let quiz_set_title = meta.title.clone();
    let (session_id, session) = sessions.start(meta, engine).await;

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id,
            quiz_set_title,
            session,
        }),
    ))
}

/// Current state of a session: active question, countdown, answers so far,
/// and the result once finished.
pub async fn get_session(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.view(id, claims.user_id()?).await?;
    Ok(Json(view))
}

/// Answers the active question.
///
/// 409 when that question was already answered (by the player or by its
/// timeout), 400 for an option that does not exist.
pub async fn submit_answer(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = sessions
        .submit(
            id,
            claims.user_id()?,
            req.question_index,
            req.selected_option_index,
        )
        .await?;

    Ok(Json(feedback))
}

/// Abandons a session without recording a result.
pub async fn abandon_session(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.abandon(id, claims.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn to_questions(rows: Vec<QuestionRow>) -> Result<Vec<Question>, AppError> {
    rows.into_iter().map(Question::try_from).collect()
}
