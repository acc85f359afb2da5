//! Relay module
//!
//! Pure building blocks used by the request handlers: identity derivation,
//! prompt assembly from stored history, and reply extraction.

use crate::chat::ChatTurn;
use crate::completion::{ChatMessage, CompletionResponse};

/// Number of prior turns included in the prompt
pub const HISTORY_TURN_LIMIT: u32 = 10;

/// Reply used when the completion API returns no usable choice
pub const FALLBACK_REPLY: &str = "No response";

/// Channel type used for mirrored replies
pub const CHANNEL_TYPE: &str = "messaging";

/// Role assigned to users created at registration
pub const USER_ROLE: &str = "user";

/// Derive a user id from an email address
///
/// Every character outside `[A-Za-z0-9_-]` is replaced with `_`, one per
/// UTF-16 code unit so ids match those issued by earlier deployments.
pub fn derive_user_id(email: &str) -> String {
    let mut user_id = String::with_capacity(email.len());
    for c in email.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            user_id.push(c);
        } else {
            user_id.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    user_id
}

/// Channel id that mirrors a user's conversation
pub fn channel_id_for(user_id: &str) -> String {
    format!("chat-{}", user_id)
}

/// Flatten stored turns into a conversation and append the new message
///
/// `history` must already be in ascending chronological order.
pub fn build_conversation(history: &[ChatTurn], message: &str) -> Vec<ChatMessage> {
    let mut conversation = Vec::with_capacity(history.len() * 2 + 1);
    for turn in history {
        conversation.push(ChatMessage::user(turn.message.as_str()));
        conversation.push(ChatMessage::assistant(turn.reply.as_str()));
    }
    conversation.push(ChatMessage::user(message));
    conversation
}

/// Text of the first choice, or [`FALLBACK_REPLY`]
pub fn extract_reply(response: &CompletionResponse) -> String {
    response
        .first_text()
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}

/// Treat absent and blank input the same way
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
