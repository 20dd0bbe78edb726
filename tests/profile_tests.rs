// tests/profile_tests.rs

use std::net::SocketAddr;

use quiz_server::{config::Config, routes, state::AppState};
use sqlx::sqlite::SqlitePoolOptions;

async fn spawn_app() -> String {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "profile_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
        question_time_limit: 60,
        tick_interval_ms: 1000,
        company_codes: vec!["ALPHA001".to_string()],
        admin_emails: vec!["manager@company.com".to_string()],
    };

    let state = AppState::new(pool, config);
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn login(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    name: &str,
) -> serde_json::Value {
    client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "company_code": "ALPHA001",
            "email": email,
            "name": name
        }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_login_assigns_roles() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let staff = login(&client, &address, "hanako@company.com", "Hanako").await;
    assert_eq!(staff["type"], "Bearer");
    assert_eq!(staff["user"]["role"], "staff");
    assert_eq!(staff["user"]["company_code"], "ALPHA001");

    // Configured admin email, matched case-insensitively
    let manager = login(&client, &address, "Manager@Company.com", "Manager").await;
    assert_eq!(manager["user"]["role"], "admin");
    assert_eq!(manager["user"]["email"], "manager@company.com");

    // Reserved display name
    let alpha = login(&client, &address, "someone@company.com", "AlphaOmega").await;
    assert_eq!(alpha["user"]["role"], "admin");
}

#[tokio::test]
async fn test_login_reuses_account_by_email() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let first = login(&client, &address, "taro@company.com", "Taro").await;
    let second = login(&client, &address, "taro@company.com", "Taro Yamada").await;

    assert_eq!(first["user"]["id"], second["user"]["id"]);
    assert_eq!(second["user"]["name"], "Taro Yamada");
}

#[tokio::test]
async fn test_profile_complex_flow() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // 1. Setup User A and User B
    let login_a = login(&client, &address, "a@company.com", "User A").await;
    let login_b = login(&client, &address, "b@company.com", "User B").await;
    let token_a = login_a["token"].as_str().unwrap();
    let token_b = login_b["token"].as_str().unwrap();

    // 2. Each token sees its own profile
    let me_a = client
        .get(&format!("{}/api/users/me", address))
        .bearer_auth(token_a)
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(me_a["email"], "a@company.com");

    // 3. Rename A; surrounding spaces are trimmed
    let response = client
        .put(&format!("{}/api/users/me", address))
        .bearer_auth(token_a)
        .json(&serde_json::json!({ "name": "  Renamed A  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(updated["name"], "Renamed A");

    // 4. Blank names are rejected
    let response = client
        .put(&format!("{}/api/users/me", address))
        .bearer_auth(token_a)
        .json(&serde_json::json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // 5. B is untouched
    let me_b = client
        .get(&format!("{}/api/users/me", address))
        .bearer_auth(token_b)
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(me_b["name"], "User B");

    // 6. No token, no profile
    let response = client
        .get(&format!("{}/api/users/me", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}
