//! Boundary between the core and the chat platform.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moana_common::{ChannelId, UserId};
use std::time::Duration;

/// A platform channel as the core sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelHandle {
    /// Channel ID.
    pub id: ChannelId,
    /// Channel name, used for transcript file names.
    pub name: String,
}

impl ChannelHandle {
    /// Creates a handle.
    pub fn new(id: ChannelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Where a message is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// A guild channel.
    Channel(ChannelId),
    /// A direct message to a user.
    User(UserId),
}

/// One message of a captured channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// When the message was posted.
    pub at: DateTime<Utc>,
    /// Author ID.
    pub author_id: UserId,
    /// Author display tag.
    pub author_name: String,
    /// Message text.
    pub text: String,
}

/// Failure of a platform call.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// The platform rejected or failed the request.
    #[error("platform request failed: {0}")]
    Platform(String),
    /// A referenced platform object does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capabilities the core needs from a chat platform.
///
/// Calls are best effort: the core logs failures and never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Whether the user holds the staff role or an equivalent permission.
    async fn has_staff_capability(&self, user: UserId) -> bool;

    /// Prevents the user from posting for `duration`.
    async fn apply_timed_restriction(
        &self,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<(), GatewayError>;

    /// Creates a private channel visible to the creator and staff.
    async fn create_ticket_channel(&self, creator: UserId) -> Result<ChannelHandle, GatewayError>;

    /// Reads the channel history, oldest message first.
    async fn capture_transcript(
        &self,
        channel: &ChannelHandle,
    ) -> Result<Vec<TranscriptEntry>, GatewayError>;

    /// Deletes a channel.
    async fn destroy_channel(&self, channel: &ChannelHandle, reason: &str) -> Result<(), GatewayError>;

    /// Posts plain text to a channel or user.
    async fn post_message(&self, target: MessageTarget, content: &str) -> Result<(), GatewayError>;
}
