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

/// Helper: record a simple run and return the activity id.
async fn create_run(app: &Router, token: &str) -> String {
    let (status, body) = common::post_json_with_auth(
        app,
        "/api/v1/activities",
        &json!({
            "activity_type": "running",
            "duration_sec": 1800.0,
            "distance_m": 5000.0,
            "elevation_gain_m": 40,
            "height": 120,
            "start_time": "2024-01-01T09:00:00Z",
            "end_time": "2024-01-01T09:30:00Z",
        }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["id"].as_str().unwrap_or_default().to_string()
}

// ──────────────────────────────────────────────────────────────────────────────
// POST /api/v1/activities
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_activity_success() {
    let app = test_app().await;
    let (token, user_id) = signup(&app, "alice").await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/activities",
        &json!({
            "activity_type": "cycling",
            "duration_sec": 3600.0,
            "distance_m": 25000.0,
            "elevation_gain_m": 300,
            "height": 450,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["activity_type"], "cycling");
    assert_eq!(json["user_id"].as_str().unwrap_or_default(), user_id);
}

#[tokio::test]
async fn create_activity_defaults_to_other_type() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/activities",
        &json!({
            "duration_sec": 600.0,
            "distance_m": 0.0,
            "elevation_gain_m": 0,
            "height": 0,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["activity_type"], "other");
}

#[tokio::test]
async fn create_activity_invalid_type_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/activities",
        &json!({
            "activity_type": "skydiving",
            "duration_sec": 600.0,
            "distance_m": 0.0,
            "elevation_gain_m": 0,
            "height": 0,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_activity_negative_distance_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/activities",
        &json!({
            "activity_type": "running",
            "duration_sec": 600.0,
            "distance_m": -5.0,
            "elevation_gain_m": 0,
            "height": 0,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_activity_end_before_start_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/activities",
        &json!({
            "activity_type": "running",
            "duration_sec": 3600.0,
            "distance_m": 10000.0,
            "elevation_gain_m": 0,
            "height": 0,
            "start_time": "2024-01-01T10:00:00Z",
            "end_time": "2024-01-01T09:00:00Z",
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ──────────────────────────────────────────────────────────────────────────────
// PATCH / PUT / DELETE /api/v1/activities/{id}
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_activity_distance() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (status, body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/activities/{activity_id}"),
        &json!({ "distance_m": 5200.0 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "patch failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["distance_m"], 5200.0);
    // Untouched fields keep their values
    assert_eq!(json["activity_type"], "running");
}

#[tokio::test]
async fn patch_end_time_before_existing_start_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (status, _body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/activities/{activity_id}"),
        &json!({ "end_time": "2024-01-01T08:00:00Z" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_replaces_activity() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/activities/{activity_id}"),
        &json!({
            "activity_type": "hiking",
            "duration_sec": 7200.0,
            "distance_m": 12000.0,
            "elevation_gain_m": 800,
            "height": 1200,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "put failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["activity_type"], "hiking");
    // Omitted times are cleared by a full replace
    assert!(json["start_time"].is_null());
}

#[tokio::test]
async fn update_other_users_activity_forbidden() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, _bob_id) = signup(&app, "bob").await;
    let activity_id = create_run(&app, &bob_token).await;

    let (status, _body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/activities/{activity_id}"),
        &json!({ "distance_m": 1.0 }),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_own_activity() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (status, _body) =
        common::delete_with_auth(&app, &format!("/api/v1/activities/{activity_id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _body) =
        common::get_with_auth(&app, &format!("/api/v1/activities/{activity_id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_other_users_activity_forbidden() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, _bob_id) = signup(&app, "bob").await;
    let activity_id = create_run(&app, &bob_token).await;

    let (status, _body) = common::delete_with_auth(
        &app,
        &format!("/api/v1/activities/{activity_id}"),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ──────────────────────────────────────────────────────────────────────────────
// /api/v1/activity-points
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_point_to_own_activity() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/activity-points",
        &json!({
            "activity_id": activity_id,
            "lat": 50.4501,
            "lon": 30.5234,
            "speed": 2.8,
            "cadence": 172,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create point failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["lat"], 50.4501);
    assert_eq!(json["cadence"], 172);
}

#[tokio::test]
async fn add_point_to_other_users_activity_forbidden() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, _bob_id) = signup(&app, "bob").await;
    let activity_id = create_run(&app, &bob_token).await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/activity-points",
        &json!({ "activity_id": activity_id, "lat": 0.0, "lon": 0.0 }),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn add_point_with_negative_speed_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/activity-points",
        &json!({
            "activity_id": activity_id,
            "lat": 0.0,
            "lon": 0.0,
            "speed": -1.0,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
