// src/handlers/history.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError, models::history::HistoryFilter, store::HistoryStore, utils::jwt::Claims,
};

/// Lists the current user's completed quizzes, newest first.
pub async fn list_history(
    State(history): State<HistoryStore>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<HistoryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let records = history.list(claims.user_id()?, &filter).await?;
    Ok(Json(records))
}

/// Attempts, average/best score and average time per question.
pub async fn history_stats(
    State(history): State<HistoryStore>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<HistoryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let stats = history.stats(claims.user_id()?, &filter).await?;
    Ok(Json(stats))
}

pub async fn get_history(
    State(history): State<HistoryStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = history
        .get(claims.user_id()?, &id)
        .await?
        .ok_or(AppError::NotFound("History entry not found".to_string()))?;

    Ok(Json(record))
}

pub async fn delete_history(
    State(history): State<HistoryStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !history.delete(claims.user_id()?, &id).await? {
        return Err(AppError::NotFound("History entry not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes every history entry of the current user.
pub async fn clear_history(
    State(history): State<HistoryStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = history.clear(claims.user_id()?).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
