//! End-to-end tests through the HTTP router
//!
//! Verifies status codes and JSON shapes for each route, with the chat
//! platform and completion API served by mockito.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chat_relay_backend::api;
use chat_relay_backend::chat::{ChatDb, User};
use chat_relay_backend::completion::OpenRouterClient;
use chat_relay_backend::config::{BotConfig, ChatPlatformConfig, CompletionConfig};
use chat_relay_backend::platform::StreamChatClient;
use chat_relay_backend::state::AppState;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn build_app(stream: &ServerGuard, router: &ServerGuard) -> (Router, Arc<ChatDb>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("routes.db");
    let db = Arc::new(ChatDb::new(db_path.to_str().unwrap()).await.unwrap());

    let http = reqwest::Client::new();
    let platform = StreamChatClient::new(
        http.clone(),
        &ChatPlatformConfig {
            api_key: "stream-key".to_string(),
            api_secret: "stream-secret".to_string(),
            base_url: stream.url(),
        },
    )
    .unwrap();
    let completion = OpenRouterClient::new(
        http,
        &CompletionConfig {
            api_key: "router-key".to_string(),
            base_url: router.url(),
            model: "test-model".to_string(),
        },
    );
    let bot = BotConfig {
        user_id: "ai-assistant".to_string(),
        name: "AI Assistant".to_string(),
    };

    let state = AppState::new(db.clone(), Arc::new(platform), Arc::new(completion), bot);
    (api::router(state), db, temp_dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
#[serial]
async fn test_health_routes() {
    let stream = Server::new_async().await;
    let router = Server::new_async().await;
    let (app, _db, _temp_dir) = build_app(&stream, &router).await;

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[serial]
async fn test_missing_fields_are_bad_requests() {
    let stream = Server::new_async().await;
    let router = Server::new_async().await;
    let (app, _db, _temp_dir) = build_app(&stream, &router).await;

    let (status, body) = send(&app, "POST", "/chat", Some(json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message and userId are required");

    let (status, body) = send(&app, "POST", "/register-user", Some(json!({"name": "Ann"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and email are required");

    let (status, _) = send(&app, "POST", "/get-messages", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong field type is a validation error too
    let (status, _) = send(&app, "POST", "/chat", Some(json!({"message": 5, "userId": "a"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn test_register_user_route() {
    let mut stream = Server::new_async().await;
    let router = Server::new_async().await;
    let (app, db, _temp_dir) = build_app(&stream, &router).await;

    let query = stream
        .mock("GET", "/users")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"users": []}"#)
        .expect(1)
        .create_async()
        .await;
    let upsert = stream
        .mock("POST", "/users")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "users": {"ann_x_com": {"id": "ann_x_com", "role": "user"}}
        })))
        .with_status(201)
        .with_body(r#"{"users": {}}"#)
        .expect(1)
        .create_async()
        .await;

    let (status, body) = send(
        &app,
        "POST",
        "/register-user",
        Some(json!({"name": "Ann", "email": "ann@x.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"userId": "ann_x_com", "name": "Ann", "email": "ann@x.com"})
    );
    query.assert_async().await;
    upsert.assert_async().await;
    assert!(db.get_user("ann_x_com").await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn test_chat_and_list_messages_routes() {
    let mut stream = Server::new_async().await;
    let mut router = Server::new_async().await;
    let (app, db, _temp_dir) = build_app(&stream, &router).await;
    db.create_user(&User::new(
        "ann_x_com".to_string(),
        "Ann".to_string(),
        "ann@x.com".to_string(),
    ))
    .await
    .unwrap();

    let query = stream
        .mock("GET", "/users")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"users": [{"id": "ann_x_com", "name": "Ann"}]}"#)
        .create_async()
        .await;
    let completion = router
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer router-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .with_status(200)
        .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Hello!"}}]}"#)
        .create_async()
        .await;
    let channel = stream
        .mock("POST", "/channels/messaging/chat-ann_x_com/query")
        .match_query(Matcher::Any)
        .with_status(201)
        .with_body(r#"{"channel": {"id": "chat-ann_x_com", "type": "messaging"}}"#)
        .create_async()
        .await;
    let message = stream
        .mock("POST", "/channels/messaging/chat-ann_x_com/message")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "message": {"text": "Hello!", "user_id": "ai-assistant"}
        })))
        .with_status(201)
        .with_body(r#"{"message": {"id": "m1", "text": "Hello!"}}"#)
        .create_async()
        .await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({"userId": "ann_x_com", "message": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "Hello!"}));
    query.assert_async().await;
    completion.assert_async().await;
    channel.assert_async().await;
    message.assert_async().await;

    for method in ["POST", "GET"] {
        let (status, body) = send(&app, method, "/get-messages?userId=ann_x_com", None).await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["userId"], "ann_x_com");
        assert_eq!(messages[0]["message"], "hi");
        assert_eq!(messages[0]["reply"], "Hello!");
    }
}

#[tokio::test]
#[serial]
async fn test_upstream_failure_is_generic_server_error() {
    let mut stream = Server::new_async().await;
    let router = Server::new_async().await;
    let (app, _db, _temp_dir) = build_app(&stream, &router).await;

    let mock = stream
        .mock("GET", "/users")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("database on fire")
        .create_async()
        .await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({"userId": "ann_x_com", "message": "hi"})),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
#[serial]
async fn test_chat_unregistered_user_is_404() {
    let mut stream = Server::new_async().await;
    let router = Server::new_async().await;
    let (app, _db, _temp_dir) = build_app(&stream, &router).await;

    let mock = stream
        .mock("GET", "/users")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"users": []}"#)
        .create_async()
        .await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(json!({"userId": "ghost", "message": "hi"})),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found. Please register first.");
}
