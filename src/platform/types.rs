//! Chat platform wire types
//!
//! Structs that mirror the chat platform's REST JSON payloads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user in the chat platform directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    /// Platform user id
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email, stored as a custom field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Platform role (e.g. "user")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A messaging channel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlatformChannel {
    /// Channel id
    pub id: String,
    /// Channel type (e.g. "messaging")
    #[serde(rename = "type")]
    pub channel_type: String,
    /// Channel id qualified by type (`type:id`)
    #[serde(default)]
    pub cid: String,
}

/// Payload for the `GET /users` query
#[derive(Serialize, Debug)]
pub struct QueryUsersPayload {
    /// Filter applied to the directory
    pub filter_conditions: serde_json::Value,
    /// Maximum number of users to return
    pub limit: u32,
}

/// Response body of `GET /users`
#[derive(Deserialize, Debug)]
pub struct QueryUsersResponse {
    /// Matched users
    #[serde(default)]
    pub users: Vec<PlatformUser>,
}

/// Request body of `POST /users`
#[derive(Serialize, Debug)]
pub struct UpsertUsersRequest<'a> {
    /// Users keyed by id
    pub users: HashMap<&'a str, &'a PlatformUser>,
}

/// Request body of `POST /channels/{type}/{id}/query`
#[derive(Serialize, Debug)]
pub struct ChannelQueryRequest<'a> {
    /// Channel data applied when the channel is created
    pub data: ChannelData<'a>,
    /// Whether to return channel state (messages, members)
    pub state: bool,
}

/// Channel creation data
#[derive(Serialize, Debug)]
pub struct ChannelData<'a> {
    /// Creator of the channel
    pub created_by_id: &'a str,
    /// Initial members
    pub members: &'a [String],
}

/// Response body of `POST /channels/{type}/{id}/query`
#[derive(Deserialize, Debug)]
pub struct ChannelQueryResponse {
    /// The created or existing channel
    pub channel: PlatformChannel,
}

/// Request body of `POST /channels/{type}/{id}/message`
#[derive(Serialize, Debug)]
pub struct SendMessageRequest<'a> {
    /// The message to send
    pub message: OutgoingMessage<'a>,
}

/// A message sent on behalf of a user
#[derive(Serialize, Debug)]
pub struct OutgoingMessage<'a> {
    /// Message text
    pub text: &'a str,
    /// Author of the message
    pub user_id: &'a str,
}

/// Response body of `POST /channels/{type}/{id}/message`
#[derive(Deserialize, Debug)]
pub struct SendMessageResponse {
    /// The stored message
    pub message: SentMessage,
}

/// A message as stored by the platform
#[derive(Deserialize, Debug, Clone)]
pub struct SentMessage {
    /// Platform message id
    pub id: String,
    /// Message text
    #[serde(default)]
    pub text: String,
}
