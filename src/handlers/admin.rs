// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError, models::question::CreateQuestionRequest, store::catalog,
    utils::html::clean_html,
};

/// Appends a question to a quiz set.
/// Admin only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    if !payload.answer_key_in_range() {
        return Err(AppError::BadRequest(
            "correct_option_index must point at one of the options".to_string(),
        ));
    }

    // Sanitize text fields
    let payload = CreateQuestionRequest {
        prompt: clean_html(&payload.prompt),
        options: payload.options.iter().map(|o| clean_html(o)).collect(),
        explanation: payload.explanation.as_deref().map(clean_html),
        ..payload
    };

    let id = catalog::insert_question(&pool, &payload).await?;
    tracing::info!("Question {} added to quiz set {}", id, payload.quiz_set_id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Deletes a question.
/// Admin only.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !catalog::delete_question(&pool, id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
