use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use favorites_sync::api::{create_router, AppState};

fn user_id() -> HeaderName {
    HeaderName::from_static("x-user-id")
}

fn create_test_server() -> TestServer {
    let state = AppState::in_memory();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn as_user(user: &'static str) -> HeaderValue {
    HeaderValue::from_static(user)
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("6f1c2a9e-2f5b-4c3e-9d7a-1b2c3d4e5f60"),
        )
        .await;

    assert_eq!(
        response.header("x-request-id"),
        "6f1c2a9e-2f5b-4c3e-9d7a-1b2c3d4e5f60"
    );
}

#[tokio::test]
async fn test_malformed_request_id_is_replaced() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;

    let echoed = response.header("x-request-id");
    let echoed = echoed.to_str().unwrap();
    assert_ne!(echoed, "not-a-uuid");
    assert!(uuid::Uuid::parse_str(echoed).is_ok());
}

#[tokio::test]
async fn test_favorites_require_caller() {
    let server = create_test_server();
    let response = server.get("/api/favorites").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_favorites() {
    let server = create_test_server();

    let response = server
        .post("/api/favorites")
        .add_header(user_id(), as_user("u1"))
        .json(&json!({
            "itemId": "m1",
            "itemType": "Movie",
            "title": "Heat",
            "rating": 8.3
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["userId"], "u1");
    assert_eq!(created["itemId"], "m1");
    assert_eq!(created["title"], "Heat");

    let response = server
        .get("/api/favorites")
        .add_header(user_id(), as_user("u1"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let favorites = body["favorites"].as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["itemType"], "Movie");
}

#[tokio::test]
async fn test_favorites_are_scoped_to_caller() {
    let server = create_test_server();

    server
        .post("/api/favorites")
        .add_header(user_id(), as_user("u1"))
        .json(&json!({ "itemId": "m1", "itemType": "Movie" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/api/favorites")
        .add_header(user_id(), as_user("u2"))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["favorites"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_favorite_conflicts() {
    let server = create_test_server();
    let body = json!({ "itemId": "s1", "itemType": "Music", "artist": "Nina Simone" });

    server
        .post("/api/favorites")
        .add_header(user_id(), as_user("u1"))
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/favorites")
        .add_header(user_id(), as_user("u1"))
        .json(&body)
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_empty_item_id_rejected() {
    let server = create_test_server();
    let response = server
        .post("/api/favorites")
        .add_header(user_id(), as_user("u1"))
        .json(&json!({ "itemId": "  ", "itemType": "Movie" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_favorite() {
    let server = create_test_server();

    server
        .post("/api/favorites")
        .add_header(user_id(), as_user("u1"))
        .json(&json!({ "itemId": "m1", "itemType": "Movie" }))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .delete("/api/favorites/Movie/m1")
        .add_header(user_id(), as_user("u1"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete("/api/favorites/Movie/m1")
        .add_header(user_id(), as_user("u1"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_unknown_item_type_rejected() {
    let server = create_test_server();
    let response = server
        .delete("/api/favorites/Podcast/p1")
        .add_header(user_id(), as_user("u1"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
