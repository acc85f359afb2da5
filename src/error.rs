//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.
//! Upstream failures are logged with their full detail and surfaced to the
//! caller only as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned to callers for every upstream failure
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Coarse classification of an [`AppError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request is missing or has malformed input
    Validation,
    /// A referenced user is absent from one of the two stores
    NotFound,
    /// Storage, chat platform, or completion API failed
    Upstream,
}

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required request input is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// User does not exist in the chat platform directory
    #[error("User not found. Please register first.")]
    UserNotRegistered(String),

    /// User exists on the chat platform but has no row in storage
    #[error("User not found in database. Please register again.")]
    UserNotInStorage(String),

    /// Database query failed
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Chat platform call failed or returned an unexpected response
    #[error("Chat platform error: {0}")]
    ChatPlatform(String),

    /// Completion API call failed or returned an unreadable response
    #[error("Completion API error: {0}")]
    Completion(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::UserNotRegistered(_) | AppError::UserNotInStorage(_) => ErrorKind::NotFound,
            AppError::Storage(_)
            | AppError::ChatPlatform(_)
            | AppError::Completion(_)
            | AppError::Internal(_) => ErrorKind::Upstream,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self.kind() {
            ErrorKind::Upstream => {
                tracing::error!(error = %self, "Request failed on upstream call");
                GENERIC_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
