//! Chat platform REST client
//!
//! Direct HTTP client for the hosted chat service. Every request carries the
//! `api_key` query parameter and a server token in `Authorization`.

use crate::config::ChatPlatformConfig;
use crate::error::AppError;
use crate::platform::token::server_token;
use crate::platform::types::{
    ChannelData, ChannelQueryRequest, ChannelQueryResponse, OutgoingMessage, PlatformChannel,
    PlatformUser, QueryUsersPayload, QueryUsersResponse, SendMessageRequest, SendMessageResponse,
    SentMessage, UpsertUsersRequest,
};
use crate::platform::ChatPlatform;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;

/// Chat platform client backed by its REST API
pub struct StreamChatClient {
    client: reqwest::Client,
    api_key: String,
    token: String,
    base_url: String,
}

impl StreamChatClient {
    /// Create a client from configuration, sharing the given HTTP client
    ///
    /// # Errors
    /// Returns `AppError::ChatPlatform` if the key is empty or the secret cannot sign a token.
    pub fn new(client: reqwest::Client, config: &ChatPlatformConfig) -> Result<Self, AppError> {
        if config.api_key.is_empty() {
            return Err(AppError::ChatPlatform("API key is empty".to_string()));
        }
        let token = server_token(&config.api_secret).map_err(|e| {
            AppError::ChatPlatform(format!("Failed to sign server token: {}", e))
        })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Authorization", &self.token)
            .header("stream-auth-type", "jwt")
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T, AppError> {
        let response = request.send().await.map_err(|e| {
            AppError::ChatPlatform(format!("Failed to send {} request: {}", operation, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                operation = operation,
                status_code = status.as_u16(),
                error_body = %error_body,
                "Chat platform returned error status"
            );

            return Err(AppError::ChatPlatform(format!(
                "{} returned error status {}",
                operation,
                status.as_u16()
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::ChatPlatform(format!("Failed to read {} response body: {}", operation, e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                operation = operation,
                response_body = %body,
                "Unparseable chat platform response"
            );
            AppError::ChatPlatform(format!("Failed to parse {} response: {}", operation, e))
        })
    }
}

#[async_trait]
impl ChatPlatform for StreamChatClient {
    async fn query_user(&self, user_id: &str) -> Result<Option<PlatformUser>, AppError> {
        let payload = QueryUsersPayload {
            filter_conditions: json!({ "id": { "$eq": user_id } }),
            limit: 1,
        };
        let payload = serde_json::to_string(&payload)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode payload: {}", e)))?;

        tracing::debug!(user_id = %user_id, "Querying chat platform user");

        let request = self
            .request(reqwest::Method::GET, "/users")
            .query(&[("payload", payload.as_str())]);
        let response: QueryUsersResponse = self.send(request, "query users").await?;

        Ok(response.users.into_iter().find(|u| u.id == user_id))
    }

    async fn upsert_user(&self, user: &PlatformUser) -> Result<(), AppError> {
        let body = UpsertUsersRequest {
            users: HashMap::from([(user.id.as_str(), user)]),
        };

        tracing::debug!(user_id = %user.id, "Upserting chat platform user");

        let request = self.request(reqwest::Method::POST, "/users").json(&body);
        let _: serde_json::Value = self.send(request, "upsert user").await?;
        Ok(())
    }

    async fn get_or_create_channel(
        &self,
        channel_type: &str,
        channel_id: &str,
        created_by_id: &str,
        members: &[String],
    ) -> Result<PlatformChannel, AppError> {
        let body = ChannelQueryRequest {
            data: ChannelData {
                created_by_id,
                members,
            },
            state: false,
        };

        let path = format!("/channels/{}/{}/query", channel_type, channel_id);
        let request = self.request(reqwest::Method::POST, &path).json(&body);
        let response: ChannelQueryResponse = self.send(request, "query channel").await?;

        Ok(response.channel)
    }

    async fn send_message(
        &self,
        channel_type: &str,
        channel_id: &str,
        text: &str,
        user_id: &str,
    ) -> Result<SentMessage, AppError> {
        let body = SendMessageRequest {
            message: OutgoingMessage { text, user_id },
        };

        let path = format!("/channels/{}/{}/message", channel_type, channel_id);
        let request = self.request(reqwest::Method::POST, &path).json(&body);
        let response: SendMessageResponse = self.send(request, "send message").await?;

        tracing::debug!(
            channel_id = %channel_id,
            message_id = %response.message.id,
            "Message sent to chat platform"
        );
        Ok(response.message)
    }
}
