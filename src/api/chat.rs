//! Chat endpoint
//!
//! Flow: verify user on chat platform -> verify user in storage -> load recent
//! history -> completion API -> store turn -> mirror reply to the user's channel.
//!
//! Each step depends on the previous one succeeding. A failure aborts the
//! remaining steps without undoing earlier ones, so a stored turn may never be
//! mirrored.

use crate::api::utils::{json_rejection, require_fields};
use crate::chat::ChatTurn;
use crate::error::AppError;
use crate::relay::{
    build_conversation, channel_id_for, extract_reply, CHANNEL_TYPE, HISTORY_TURN_LIMIT,
};
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Request to send a chat message
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Message content
    #[serde(default)]
    pub message: Option<String>,
    /// Registered user id
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Chat reply
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// Assistant reply (or the fallback text)
    pub reply: String,
}

/// Internal function that handles the actual chat logic
pub async fn chat_internal(
    state: &AppState,
    request: ChatRequest,
) -> Result<ChatResponse, AppError> {
    let [message, user_id] = require_fields(
        [request.message, request.user_id],
        "Message and userId are required",
    )?;

    if state.platform.query_user(&user_id).await?.is_none() {
        return Err(AppError::UserNotRegistered(user_id));
    }
    if state.db.get_user(&user_id).await?.is_none() {
        return Err(AppError::UserNotInStorage(user_id));
    }

    let history = state.db.recent_turns(&user_id, HISTORY_TURN_LIMIT).await?;
    let conversation = build_conversation(&history, &message);

    debug!(
        user_id = %user_id,
        history_turns = history.len(),
        message_len = message.len(),
        "Sending conversation to completion API"
    );

    let completion = state.completion.complete(&conversation).await?;
    if completion.first_text().is_none() {
        warn!(
            user_id = %user_id,
            choice_count = completion.choices.len(),
            "Completion response had no usable choice, using fallback reply"
        );
    }
    let reply = extract_reply(&completion);

    let turn = ChatTurn::new(user_id.clone(), message, reply.clone());
    state.db.add_turn(&turn).await?;

    let channel_id = channel_id_for(&user_id);
    let members = vec![user_id.clone(), state.bot.user_id.clone()];
    let channel = state
        .platform
        .get_or_create_channel(CHANNEL_TYPE, &channel_id, &state.bot.user_id, &members)
        .await?;
    state
        .platform
        .send_message(CHANNEL_TYPE, &channel.id, &reply, &state.bot.user_id)
        .await?;

    info!(
        user_id = %user_id,
        reply_len = reply.len(),
        "Chat turn completed"
    );

    Ok(ChatResponse { reply })
}

/// POST /chat - Send a message and receive the assistant reply
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(json_rejection)?;
    chat_internal(&state, request).await.map(Json)
}
