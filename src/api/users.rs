//! User registration endpoint
//!
//! Registers a user in both the chat platform directory and local storage.
//! The two stores are checked and written independently; neither write is
//! rolled back if the other fails.

use crate::api::utils::{json_rejection, require_fields};
use crate::chat::User;
use crate::error::AppError;
use crate::platform::PlatformUser;
use crate::relay::{derive_user_id, USER_ROLE};
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request to register a user
#[derive(Debug, Default, Deserialize)]
pub struct RegisterUserRequest {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Email address (the user id is derived from it)
    #[serde(default)]
    pub email: Option<String>,
}

/// Registered user response
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponse {
    /// Derived user id
    pub user_id: String,
    /// Display name as submitted
    pub name: String,
    /// Email as submitted
    pub email: String,
}

/// Register a user, skipping whichever store already knows them
pub async fn register_user_internal(
    state: &AppState,
    request: RegisterUserRequest,
) -> Result<RegisterUserResponse, AppError> {
    let [name, email] =
        require_fields([request.name, request.email], "Name and email are required")?;
    let user_id = derive_user_id(&email);

    if state.platform.query_user(&user_id).await?.is_none() {
        let platform_user = PlatformUser {
            id: user_id.clone(),
            name: Some(name.clone()),
            email: Some(email.clone()),
            role: Some(USER_ROLE.to_string()),
        };
        state.platform.upsert_user(&platform_user).await?;
        info!(user_id = %user_id, "Registered user on chat platform");
    }

    if state.db.get_user(&user_id).await?.is_none() {
        let user = User::new(user_id.clone(), name.clone(), email.clone());
        state.db.create_user(&user).await?;
        info!(user_id = %user_id, "Stored new user");
    }

    Ok(RegisterUserResponse {
        user_id,
        name,
        email,
    })
}

/// POST /register-user - Register a user by name and email
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Json<RegisterUserResponse>, AppError> {
    let Json(request) = payload.map_err(json_rejection)?;
    register_user_internal(&state, request).await.map(Json)
}
