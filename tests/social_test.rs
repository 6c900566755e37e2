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
        }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["id"].as_str().unwrap_or_default().to_string()
}

// ──────────────────────────────────────────────────────────────────────────────
// Comments
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comment_and_reply_thread() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, _bob_id) = signup(&app, "bob").await;
    let activity_id = create_run(&app, &alice_token).await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({ "activity_id": activity_id, "body": "Great pace!" }),
        &bob_token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "comment failed: {body}");
    let root: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let root_id = root["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({
            "activity_id": activity_id,
            "body": "Thanks!",
            "parent_comment_id": root_id,
        }),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "reply failed: {body}");
    let reply: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let reply_id = reply["id"].as_str().unwrap_or_default().to_string();

    // Nested reply, two levels deep
    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({
            "activity_id": activity_id,
            "body": "See you out there",
            "parent_comment_id": reply_id,
        }),
        &bob_token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Direct replies only
    let (status, body) =
        common::get_with_auth(&app, &format!("/api/v1/comments/{root_id}/replies"), &bob_token)
            .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    assert_eq!(json.as_array().unwrap_or(&empty).len(), 1);

    // The full thread reaches both levels
    let (status, body) =
        common::get_with_auth(&app, &format!("/api/v1/comments/{root_id}/thread"), &bob_token)
            .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json.as_array().unwrap_or(&empty).len(), 2);
}

#[tokio::test]
async fn reply_to_comment_on_other_activity_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let first_activity = create_run(&app, &token).await;
    let second_activity = create_run(&app, &token).await;

    let (_status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({ "activity_id": first_activity, "body": "root" }),
        &token,
    )
    .await;
    let root: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let root_id = root["id"].as_str().unwrap_or_default().to_string();

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({
            "activity_id": second_activity,
            "body": "crossed wires",
            "parent_comment_id": root_id,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_comment_body_rejected() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({ "activity_id": activity_id, "body": "   " }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_other_users_comment_forbidden_and_row_remains() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, _bob_id) = signup(&app, "bob").await;
    let activity_id = create_run(&app, &alice_token).await;

    let (_status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({ "activity_id": activity_id, "body": "Bob's comment" }),
        &bob_token,
    )
    .await;
    let comment: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let comment_id = comment["id"].as_str().unwrap_or_default().to_string();

    let (status, _body) =
        common::delete_with_auth(&app, &format!("/api/v1/comments/{comment_id}"), &alice_token)
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The comment is still there
    let (status, _body) =
        common::get_with_auth(&app, &format!("/api/v1/comments/{comment_id}"), &alice_token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn edit_own_comment_body() {
    let app = test_app().await;
    let (token, _id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &token).await;

    let (_status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/comments",
        &json!({ "activity_id": activity_id, "body": "typo" }),
        &token,
    )
    .await;
    let comment: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let comment_id = comment["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/comments/{comment_id}"),
        &json!({ "body": "fixed" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "edit failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["body"], "fixed");
}

// ──────────────────────────────────────────────────────────────────────────────
// Kudos
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_kudos_is_conflict_and_row_count_stays_one() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, _bob_id) = signup(&app, "bob").await;
    let activity_id = create_run(&app, &alice_token).await;

    let request = json!({ "activity_id": activity_id });
    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/kudos", &request, &bob_token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/kudos", &request, &bob_token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = common::get_with_auth(&app, "/api/v1/kudos", &bob_token).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    assert_eq!(json.as_array().unwrap_or(&empty).len(), 1);
}

#[tokio::test]
async fn two_users_can_kudos_the_same_activity() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (bob_token, _bob_id) = signup(&app, "bob").await;
    let activity_id = create_run(&app, &alice_token).await;

    let request = json!({ "activity_id": activity_id });
    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/kudos", &request, &alice_token).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/kudos", &request, &bob_token).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn take_back_own_kudos() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let activity_id = create_run(&app, &alice_token).await;

    let (_status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/kudos",
        &json!({ "activity_id": activity_id }),
        &alice_token,
    )
    .await;
    let kudos: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let kudos_id = kudos["id"].as_str().unwrap_or_default().to_string();

    let (status, _body) =
        common::delete_with_auth(&app, &format!("/api/v1/kudos/{kudos_id}"), &alice_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ──────────────────────────────────────────────────────────────────────────────
// Followers
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn follow_and_unfollow() {
    let app = test_app().await;
    let (alice_token, alice_id) = signup(&app, "alice").await;
    let (_bob_token, bob_id) = signup(&app, "bob").await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/followers",
        &json!({ "followee_id": bob_id }),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "follow failed: {body}");

    // Composite-key lookup
    let (status, _body) = common::get_with_auth(
        &app,
        &format!("/api/v1/followers/{alice_id}/{bob_id}"),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _body) = common::delete_with_auth(
        &app,
        &format!("/api/v1/followers/{alice_id}/{bob_id}"),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _body) = common::get_with_auth(
        &app,
        &format!("/api/v1/followers/{alice_id}/{bob_id}"),
        &alice_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn self_follow_rejected() {
    let app = test_app().await;
    let (token, user_id) = signup(&app, "alice").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/followers",
        &json!({ "followee_id": user_id }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_follow_is_conflict() {
    let app = test_app().await;
    let (alice_token, _alice_id) = signup(&app, "alice").await;
    let (_bob_token, bob_id) = signup(&app, "bob").await;

    let request = json!({ "followee_id": bob_id });
    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/followers", &request, &alice_token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _body) =
        common::post_json_with_auth(&app, "/api/v1/followers", &request, &alice_token).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unfollow_for_someone_else_forbidden() {
    let app = test_app().await;
    let (alice_token, alice_id) = signup(&app, "alice").await;
    let (_bob_token, bob_id) = signup(&app, "bob").await;
    let (carol_token, _carol_id) = signup(&app, "carol").await;

    common::post_json_with_auth(
        &app,
        "/api/v1/followers",
        &json!({ "followee_id": bob_id }),
        &alice_token,
    )
    .await;

    let (status, _body) = common::delete_with_auth(
        &app,
        &format!("/api/v1/followers/{alice_id}/{bob_id}"),
        &carol_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
