// Application state
// Process-wide client handles, built once at startup and shared by every request

use crate::chat::ChatDb;
use crate::completion::CompletionProvider;
use crate::config::BotConfig;
use crate::error::AppError;
use crate::platform::{ChatPlatform, PlatformUser};
use std::sync::Arc;

/// Handles injected into every request handler
///
/// All fields are read-only after construction; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway
    pub db: Arc<ChatDb>,
    /// Chat platform client
    pub platform: Arc<dyn ChatPlatform>,
    /// Completion client
    pub completion: Arc<dyn CompletionProvider>,
    /// Identity that authors mirrored replies
    pub bot: BotConfig,
}

impl AppState {
    /// Create the application state from its collaborators
    pub fn new(
        db: Arc<ChatDb>,
        platform: Arc<dyn ChatPlatform>,
        completion: Arc<dyn CompletionProvider>,
        bot: BotConfig,
    ) -> Self {
        Self {
            db,
            platform,
            completion,
            bot,
        }
    }

    /// Make sure the bot identity exists on the chat platform
    pub async fn ensure_bot_user(&self) -> Result<(), AppError> {
        let bot_user = PlatformUser {
            id: self.bot.user_id.clone(),
            name: Some(self.bot.name.clone()),
            email: None,
            role: None,
        };
        self.platform.upsert_user(&bot_user).await
    }
}
