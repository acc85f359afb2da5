//! Completion API types
//!
//! Structs that mirror the OpenAI-compatible chat completion JSON format.
//! Response types are lenient: any JSON body deserializes, with missing,
//! null or mistyped fields left empty, and the caller decides what an empty
//! result means.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Role of a conversational entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the assistant/AI
    Assistant,
}

/// One entry of the conversation sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced the entry
    pub role: MessageRole,
    /// Entry text
    pub content: String,
}

impl ChatMessage {
    /// Create a user entry
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant entry
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `/chat/completions`
#[derive(Serialize, Debug)]
pub struct CompletionRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Ordered conversation
    pub messages: &'a [ChatMessage],
}

/// Top-level completion response
#[derive(Deserialize, Debug, Default)]
pub struct CompletionResponse {
    /// Candidate completions
    #[serde(default, deserialize_with = "lenient_choices")]
    pub choices: Vec<Choice>,
}

/// A single candidate completion
#[derive(Deserialize, Debug, Default)]
pub struct Choice {
    /// Generated message
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<ChoiceMessage>,
    /// Why the model stopped generating (if applicable)
    #[serde(default, deserialize_with = "lenient")]
    pub finish_reason: Option<String>,
}

/// Message inside a choice
#[derive(Deserialize, Debug, Default)]
pub struct ChoiceMessage {
    /// Generated text
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
}

/// Deserialize a field, falling back to its default when the shape is wrong
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Keep positions stable: a malformed entry becomes an empty choice
fn lenient_choices<'de, D>(deserializer: D) -> Result<Vec<Choice>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

impl CompletionResponse {
    /// Interpret an already parsed JSON body
    ///
    /// Never fails: a body that is not an object yields no choices.
    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Text of the first choice, if present and non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|text| !text.is_empty())
    }
}
