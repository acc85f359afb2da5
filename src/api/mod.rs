//! API module
//!
//! Contains HTTP request handlers for the relay endpoints

pub mod chat;
pub mod health;
pub mod messages;
pub mod users;
pub mod utils;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application routes
///
/// Middleware layers are applied by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::hello_world))
        .route("/api/health", get(health::health_check))
        .route("/chat", post(chat::chat))
        .route("/register-user", post(users::register_user))
        // userId arrives in the query string for both verbs
        .route(
            "/get-messages",
            post(messages::get_messages).get(messages::get_messages),
        )
        .with_state(state)
}
