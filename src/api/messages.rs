//! Message history endpoint

use crate::api::utils::{query_rejection, require_fields};
use crate::chat::ChatTurn;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{rejection::QueryRejection, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Query parameters for the history lookup
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMessagesQuery {
    /// User whose turns are returned
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Stored turns for a user
#[derive(Debug, Serialize)]
pub struct GetMessagesResponse {
    /// Turns in storage order
    pub messages: Vec<ChatTurn>,
}

/// Load every stored turn for a user
pub async fn get_messages_internal(
    state: &AppState,
    query: GetMessagesQuery,
) -> Result<GetMessagesResponse, AppError> {
    let [user_id] = require_fields([query.user_id], "userId is required")?;
    let messages = state.db.all_turns(&user_id).await?;
    Ok(GetMessagesResponse { messages })
}

/// POST|GET /get-messages?userId= - List a user's stored turns
pub async fn get_messages(
    State(state): State<AppState>,
    query: Result<Query<GetMessagesQuery>, QueryRejection>,
) -> Result<Json<GetMessagesResponse>, AppError> {
    let Query(query) = query.map_err(query_rejection)?;
    get_messages_internal(&state, query).await.map(Json)
}
