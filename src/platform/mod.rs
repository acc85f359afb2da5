//! Chat platform module
//!
//! Wraps the hosted real-time messaging service. The relay uses it to verify
//! that a user is registered and to mirror assistant replies into a channel.

pub mod stream_client;
pub mod token;
pub mod types;

use crate::error::AppError;
use async_trait::async_trait;

pub use stream_client::StreamChatClient;
pub use types::{PlatformChannel, PlatformUser, SentMessage};

/// Operations the relay needs from the chat platform
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Look up a user by exact id
    async fn query_user(&self, user_id: &str) -> Result<Option<PlatformUser>, AppError>;

    /// Create or update a user
    async fn upsert_user(&self, user: &PlatformUser) -> Result<(), AppError>;

    /// Fetch a channel, creating it with the given creator and members if absent
    async fn get_or_create_channel(
        &self,
        channel_type: &str,
        channel_id: &str,
        created_by_id: &str,
        members: &[String],
    ) -> Result<PlatformChannel, AppError>;

    /// Post a message to a channel on behalf of `user_id`
    async fn send_message(
        &self,
        channel_type: &str,
        channel_id: &str,
        text: &str,
        user_id: &str,
    ) -> Result<SentMessage, AppError>;
}
