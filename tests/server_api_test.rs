//! Tests for the HTTP API, driven through the router without a socket.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use strictly_arena::{AppState, InMemoryStore, router};

fn app() -> Router {
    router(AppState::from_store(Arc::new(InMemoryStore::new())), true)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/register",
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_index_serves_html() {
    let app = app();
    let request = Request::builder().uri("/").body(Body::empty()).expect("Request");
    let response = app.oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.expect("Body").to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("<html"));
}

#[tokio::test]
async fn test_register_then_login() {
    let app = app();

    let (status, body) = register(&app, "alice", "pw").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        Some(json!({ "username": "alice", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
}

#[tokio::test]
async fn test_register_errors() {
    let app = app();

    let (status, body) = register(&app, "", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username and password required");

    register(&app, "bob", "pw").await;
    let (status, body) = register(&app, "bob", "other").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = app();
    register(&app, "carol", "right").await;

    for creds in [
        json!({ "username": "carol", "password": "wrong" }),
        json!({ "username": "nobody", "password": "right" }),
    ] {
        let (status, body) = send(&app, "POST", "/login", Some(creds)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_move_computer_replies() {
    let app = app();
    register(&app, "dave", "pw").await;

    let (status, body) = send(
        &app,
        "POST",
        "/move",
        Some(json!({
            "username": "dave",
            "board": ["", "", "", "", "X", "", "", "", ""],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], Value::Null);
    let board = body["board"].as_array().expect("Board array");
    assert_eq!(board.len(), 9);
    assert_eq!(board.iter().filter(|s| *s == "O").count(), 1);
    let played = body["computer_move"].as_u64().expect("Computer move") as usize;
    assert_eq!(board[played], "O");
    assert_eq!(body["scores"][0]["wins"], 0);
}

#[tokio::test]
async fn test_move_computer_wins_and_records_loss() {
    let app = app();
    register(&app, "erin", "pw").await;

    let (status, body) = send(
        &app,
        "POST",
        "/move",
        Some(json!({
            "username": "erin",
            "board": ["X", "X", "", "O", "O", "", "", "", "X"],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], "O");
    assert_eq!(body["computer_move"], 5);
    assert_eq!(body["board"][5], "O");

    let (status, scores) = send(&app, "GET", "/leaderboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scores[0]["username"], "erin");
    assert_eq!(scores[0]["losses"], 1);
    assert_eq!(scores[0]["wins"], 0);
}

#[tokio::test]
async fn test_move_on_finished_board_records_human_win() {
    let app = app();
    register(&app, "frank", "pw").await;

    let (status, body) = send(
        &app,
        "POST",
        "/move",
        Some(json!({
            "username": "frank",
            "board": ["X", "X", "X", "O", "O", "", "", "", ""],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], "X");
    assert_eq!(body["computer_move"], Value::Null);
    assert_eq!(body["scores"][0]["wins"], 1);
}

#[tokio::test]
async fn test_anonymous_move_is_not_recorded() {
    let app = app();
    register(&app, "grace", "pw").await;

    let (status, body) = send(
        &app,
        "POST",
        "/move",
        Some(json!({ "board": ["X", "X", "X", "O", "O", "", "", "", ""] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], "X");
    assert_eq!(body["scores"][0]["wins"], 0);
}

#[tokio::test]
async fn test_move_rejects_malformed_board() {
    let app = app();

    for board in [
        json!(["X", "", ""]),
        json!(["Z", "", "", "", "", "", "", "", ""]),
        json!("XX.OO...."),
    ] {
        let (status, body) = send(&app, "POST", "/move", Some(json!({ "board": board }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{board}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_markup_username_stays_text() {
    let app = app();
    let name = "<img src=x onerror=alert(1)>";
    let (status, _) = register(&app, name, "pw").await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri("/leaderboard")
        .body(Body::empty())
        .expect("Request");
    let response = app.clone().oneshot(request).await.expect("Request failed");
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = response.into_body().collect().await.expect("Body").to_bytes();
    let scores: Value = serde_json::from_slice(&bytes).expect("JSON body");
    assert_eq!(scores[0]["username"], name);

    // The client renders leaderboard rows through textContent only.
    let request = Request::builder().uri("/").body(Body::empty()).expect("Request");
    let response = app.oneshot(request).await.expect("Request failed");
    let bytes = response.into_body().collect().await.expect("Body").to_bytes();
    let page = String::from_utf8_lossy(&bytes);
    assert!(!page.contains("innerHTML"));
    assert!(!page.contains("insertAdjacentHTML"));
    assert!(page.contains("td.textContent"));
}

#[tokio::test]
async fn test_leaderboard_empty() {
    let app = app();
    let (status, body) = send(&app, "GET", "/leaderboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
