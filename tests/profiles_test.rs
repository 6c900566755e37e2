mod common;

use axum::http::StatusCode;
use axum::Router;
use migration::{Migrator, MigratorTrait};
use serde_json::json;

use stride_api::config::{Config, Environment};
use stride_api::services::ClientSync;
use stride_api::state::AppState;

async fn test_app() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let config = Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
        jwt_expiration_secs: 3600,
        frontend_url: "http://localhost:3001".to_string(),
        clients_service_url: String::new(),
        clients_service_user: String::new(),
        clients_service_password: String::new(),
    };
    let clients = ClientSync::new(&config);
    let state = AppState {
        db,
        config,
        clients,
    };

    stride_api::routes::router().with_state(state)
}

/// Helper: sign up a user and return (token, `user_id`).
async fn signup(app: &Router, username: &str) -> (String, String) {
    let (status, body) = common::post_json(
        app,
        "/api/v1/auth/signup",
        &json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "Password123",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    (
        json["token"].as_str().unwrap_or_default().to_string(),
        json["user_id"].as_str().unwrap_or_default().to_string(),
    )
}

// ──────────────────────────────────────────────────────────────────────────────
// POST /api/v1/profiles
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_profile_success() {
    let app = test_app().await;
    let (token, user_id) = signup(&app, "alice").await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/profiles",
        &json!({
            "display_name": "Alice",
            "city": "Kyiv",
            "country": "Ukraine",
            "gender": "female",
            "weight_kg": 58.5,
            "height_cm": 168.0,
            "age": 29,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["user_id"].as_str().unwrap_or_default(), user_id);
    assert_eq!(json["display_name"], "Alice");
    assert_eq!(json["gender"], "female");
}

#[tokio::test]
async fn create_second_profile_conflict() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;

    let request = json!({ "display_name": "Alice" });
    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/profiles", &request, &token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/profiles", &request, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_profile_negative_weight_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/profiles",
        &json!({ "display_name": "Alice", "weight_kg": -1.0 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_profile_invalid_gender_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/profiles",
        &json!({ "display_name": "Alice", "gender": "unknown" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ──────────────────────────────────────────────────────────────────────────────
// GET /api/v1/profiles/{user_id}
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_is_keyed_by_user_id() {
    let app = test_app().await;
    let (token, user_id) = signup(&app, "alice").await;

    common::post_json_with_auth(
        &app,
        "/api/v1/profiles",
        &json!({ "display_name": "Alice" }),
        &token,
    )
    .await;

    let (status, body) =
        common::get_with_auth(&app, &format!("/api/v1/profiles/{user_id}"), &token).await;
    assert_eq!(status, StatusCode::OK, "get failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["display_name"], "Alice");
}

#[tokio::test]
async fn missing_profile_returns_404() {
    let app = test_app().await;
    let (token, user_id) = signup(&app, "alice").await;

    let (status, _body) =
        common::get_with_auth(&app, &format!("/api/v1/profiles/{user_id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ──────────────────────────────────────────────────────────────────────────────
// PATCH / DELETE /api/v1/profiles/{user_id}
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_own_profile() {
    let app = test_app().await;
    let (token, user_id) = signup(&app, "alice").await;

    common::post_json_with_auth(
        &app,
        "/api/v1/profiles",
        &json!({ "display_name": "Alice" }),
        &token,
    )
    .await;

    let (status, body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/profiles/{user_id}"),
        &json!({ "bio": "Marathoner", "age": 30 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "update failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["bio"], "Marathoner");
    assert_eq!(json["age"], 30);
    assert_eq!(json["display_name"], "Alice");
}

#[tokio::test]
async fn update_other_profile_forbidden() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, bob_id) = signup(&app, "bob").await;

    common::post_json_with_auth(
        &app,
        "/api/v1/profiles",
        &json!({ "display_name": "Bob" }),
        &bob_token,
    )
    .await;

    let (status, _body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/profiles/{bob_id}"),
        &json!({ "bio": "vandalized" }),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_own_profile() {
    let app = test_app().await;
    let (token, user_id) = signup(&app, "alice").await;

    common::post_json_with_auth(
        &app,
        "/api/v1/profiles",
        &json!({ "display_name": "Alice" }),
        &token,
    )
    .await;

    let (status, _body) =
        common::delete_with_auth(&app, &format!("/api/v1/profiles/{user_id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _body) =
        common::get_with_auth(&app, &format!("/api/v1/profiles/{user_id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
