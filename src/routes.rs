// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, history, profile, quiz},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, users, quiz, history, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, history store, live sessions).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/company-code", post(auth::verify_company_code))
        .route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .layer(auth_layer.clone());

    let quiz_routes = Router::new()
        .route("/sets", get(quiz::list_quiz_sets))
        .route("/sets/{id}", get(quiz::get_quiz_set))
        // Protected quiz routes
        .merge(
            Router::new()
                .route("/sessions", post(quiz::start_session))
                .route(
                    "/sessions/{id}",
                    get(quiz::get_session).delete(quiz::abandon_session),
                )
                .route("/sessions/{id}/answer", post(quiz::submit_answer))
                .layer(auth_layer.clone()),
        );

    let history_routes = Router::new()
        .route(
            "/",
            get(history::list_history).delete(history::clear_history),
        )
        .route("/stats", get(history::history_stats))
        .route(
            "/{id}",
            get(history::get_history).delete(history::delete_history),
        )
        .layer(auth_layer.clone());

    let admin_routes = Router::new()
        .route("/questions", post(admin::create_question))
        .route("/questions/{id}", delete(admin::delete_question))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(auth_layer);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/history", history_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
