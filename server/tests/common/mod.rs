#![allow(dead_code)]

use axum::http::HeaderName;
use axum_test::{TestRequest, TestServer};
use marketplace_server::core::{AppState, encode_jwt};
use serde_json::json;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "marketplace-test-secret-not-for-production";

/// AppState for tests, with uploads in a shared temp directory
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    create_test_state_with_uploads(pool, std::env::temp_dir().join("marketplace-test-uploads"))
}

pub fn create_test_state_with_uploads(pool: SqlitePool, upload_dir: PathBuf) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_JWT_SECRET.to_string(), upload_dir))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = marketplace_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Valid 24 h token for a fixture user
pub fn create_test_jwt(user_id: i32, nickname: &str) -> String {
    encode_jwt(nickname.to_string(), user_id, TEST_JWT_SECRET).expect("Failed to create JWT token")
}

pub fn with_token(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("authorization"),
        format!("Bearer {}", token),
    )
}

/// Fixture users (ids from `fixtures/users.sql`)
pub fn alice() -> String {
    create_test_jwt(1, "alice")
}

pub fn bob() -> String {
    create_test_jwt(2, "bob")
}

pub fn carol_moderator() -> String {
    create_test_jwt(3, "carol")
}

pub fn dave_admin() -> String {
    create_test_jwt(4, "dave")
}

pub fn erin_banned() -> String {
    create_test_jwt(5, "erin")
}

pub fn grace_vip() -> String {
    create_test_jwt(7, "grace")
}

/// Registers through the API and returns the new user id
pub async fn register(server: &TestServer, nickname: &str, password: &str) -> i32 {
    let response = server
        .post("/auth/register")
        .json(&json!({ "nickname": nickname, "password": password }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let user: serde_json::Value = response.json();
    user["user_id"].as_i64().expect("user_id") as i32
}
