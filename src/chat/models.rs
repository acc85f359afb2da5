//! Chat data models
//!
//! Defines structures for registered users and persisted chat turns.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier derived from the email address
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Email address as submitted at registration
    pub email: String,
    /// When the user was stored (Unix timestamp, milliseconds)
    pub created_at: i64,
}

impl User {
    /// Create a new user stamped with the current time
    pub fn new(user_id: String, name: String, email: String) -> Self {
        Self {
            user_id,
            name,
            email,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// One completed exchange: the user's message and the assistant's reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    /// Row id assigned by storage (0 until inserted)
    pub id: i64,
    /// Owner of this turn
    pub user_id: String,
    /// User-submitted text
    pub message: String,
    /// Assistant-generated text
    pub reply: String,
    /// When the turn was stored (Unix timestamp, milliseconds)
    pub created_at: i64,
}

impl ChatTurn {
    /// Create a new, not yet persisted turn
    pub fn new(user_id: String, message: String, reply: String) -> Self {
        Self {
            id: 0,
            user_id,
            message,
            reply,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}
