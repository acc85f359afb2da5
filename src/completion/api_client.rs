//! Completion API client
//!
//! Direct HTTP client for an OpenAI-compatible chat completion endpoint.
//! One synchronous request is made per chat turn.

use crate::completion::types::{ChatMessage, CompletionRequest, CompletionResponse};
use crate::completion::CompletionProvider;
use crate::config::CompletionConfig;
use crate::error::AppError;
use async_trait::async_trait;

/// Completion client for OpenRouter (or any OpenAI-compatible API)
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a client from configuration, sharing the given HTTP client
    pub fn new(client: reqwest::Client, config: &CompletionConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    /// Call the completion API with the full conversation
    ///
    /// # Errors
    /// * Returns `AppError::Completion` if the API key is missing, the HTTP request fails,
    ///   the API answers with an error status, or the body is not JSON.
    ///
    /// Any JSON body is accepted; one without usable choices yields an empty
    /// response rather than an error.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Completion("API key is empty".to_string()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = CompletionRequest {
            model: &self.model,
            messages,
        };

        tracing::debug!(
            url = %url,
            model = %self.model,
            message_count = messages.len(),
            "Calling completion API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                AppError::Completion(format!(
                    "Failed to send HTTP request to completion API: {}",
                    e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Completion API returned error status"
            );

            if status_code == 429 {
                return Err(AppError::Completion(format!(
                    "Completion API rate limit exceeded (HTTP {})",
                    status_code
                )));
            }

            return Err(AppError::Completion(format!(
                "Completion API returned error status {}",
                status_code
            )));
        }

        let response_body = response.text().await.map_err(|e| {
            AppError::Completion(format!(
                "Failed to read response body from completion API: {}",
                e
            ))
        })?;

        let body: serde_json::Value = serde_json::from_str(&response_body).map_err(|e| {
            tracing::error!(
                response_body = %response_body,
                "Unparseable completion response"
            );
            AppError::Completion(format!(
                "Failed to parse JSON response from completion API: {}",
                e
            ))
        })?;
        let parsed = CompletionResponse::from_json(body);

        tracing::debug!(
            choice_count = parsed.choices.len(),
            "Received response from completion API"
        );

        Ok(parsed)
    }
}
