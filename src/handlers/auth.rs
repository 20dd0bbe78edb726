// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CompanyCodeRequest, LoginRequest, User},
    utils::{
        company::{is_valid_code, normalize_code, role_for},
        jwt::sign_jwt,
    },
};

/// Checks a company code before the sign-in step.
///
/// Always 200; the body says whether the code is accepted.
pub async fn verify_company_code(
    State(config): State<Config>,
    Json(payload): Json<CompanyCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let valid = is_valid_code(&payload.company_code, &config.company_codes);
    if !valid {
        tracing::info!("Rejected company code '{}'", normalize_code(&payload.company_code));
    }

    Ok(Json(json!({ "valid": valid })))
}

/// Signs a user in with a company code.
///
/// The code must be on the configured list. The user is created on first
/// sign-in and updated afterwards (keyed by email). Returns a JWT.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !is_valid_code(&payload.company_code, &config.company_codes) {
        return Err(AppError::AuthError("Invalid company code".to_string()));
    }

    let email = payload.email.trim().to_lowercase();
    let name = payload.name.trim().to_string();
    let role = role_for(&email, &name, &config.admin_emails);
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name, role, company_code, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET
            name = excluded.name,
            role = excluded.role,
            company_code = excluded.company_code,
            updated_at = excluded.updated_at
        RETURNING id, email, name, role, company_code, created_at, updated_at
        "#,
    )
    .bind(&email)
    .bind(&name)
    .bind(role)
    .bind(normalize_code(&payload.company_code))
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?;

    let token = sign_jwt(user.id, &user.role, &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!("User {} signed in as {}", user.id, user.role);

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": user
    })))
}
