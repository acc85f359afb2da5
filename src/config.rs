//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Credentials have no default and must be provided.

use anyhow::{anyhow, Context};
use std::env;
use std::fmt;

/// Default chat platform REST endpoint
pub const DEFAULT_STREAM_BASE_URL: &str = "https://chat.stream-io-api.com";

/// Default completion API endpoint (OpenAI-compatible)
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default completion model
pub const DEFAULT_COMPLETION_MODEL: &str = "google/gemini-2.0-flash-exp:free";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Chat platform configuration
    pub chat_platform: ChatPlatformConfig,
    /// Completion API configuration
    pub completion: CompletionConfig,
    /// Outbound HTTP client configuration shared by both upstreams
    pub http: HttpConfig,
    /// Identity used for mirrored assistant replies
    pub bot: BotConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection string or file path
    pub url: String,
}

/// Chat platform configuration
#[derive(Clone)]
pub struct ChatPlatformConfig {
    /// Public API key
    pub api_key: String,
    /// Secret used to sign server tokens
    pub api_secret: String,
    /// REST base URL
    pub base_url: String,
}

/// Completion API configuration
#[derive(Clone)]
pub struct CompletionConfig {
    /// Bearer API key
    pub api_key: String,
    /// Base URL (the client appends `/chat/completions`)
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Request timeout in seconds; `None` means no timeout
    pub timeout_secs: Option<u64>,
}

/// Bot identity configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Chat platform user id of the bot
    pub user_id: String,
    /// Display name of the bot
    pub name: String,
}

impl fmt::Debug for ChatPlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatPlatformConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// # Errors
    /// Returns an error naming the first required variable that is unset or empty.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:data/chat-relay.db".to_string()),
            },
            chat_platform: ChatPlatformConfig {
                api_key: required("STREAM_API_KEY")?,
                api_secret: required("STREAM_API_SECRET")?,
                base_url: env::var("STREAM_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_STREAM_BASE_URL.to_string()),
            },
            completion: CompletionConfig {
                api_key: required("OPENROUTER_API_KEY")?,
                base_url: env::var("OPENROUTER_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_OPENROUTER_BASE_URL.to_string()),
                model: env::var("COMPLETION_MODEL")
                    .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string()),
            },
            http: HttpConfig {
                timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok()),
            },
            bot: BotConfig {
                user_id: env::var("BOT_USER_ID").unwrap_or_else(|_| "ai-assistant".to_string()),
                name: env::var("BOT_USER_NAME").unwrap_or_else(|_| "AI Assistant".to_string()),
            },
        })
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    let value = env::var(name).with_context(|| format!("{} is not defined", name))?;
    if value.trim().is_empty() {
        return Err(anyhow!("{} is empty", name));
    }
    Ok(value)
}
