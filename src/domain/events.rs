//! Client events consumed by the unread core.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{CandidateMessage, MessageId, ReadTarget};

/// Server-pushed authoritative unread state for one channel or thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadEvent {
    /// Channel or thread the counter applies to.
    pub target: ReadTarget,
    /// Authoritative unread count.
    pub count: u32,
    /// Last read message; `None` keeps the recorded one.
    #[serde(default)]
    pub last_message_id: Option<MessageId>,
}

impl UnreadEvent {
    /// Creates an unread event.
    #[must_use]
    pub const fn new(target: ReadTarget, count: u32, last_message_id: Option<MessageId>) -> Self {
        Self {
            target,
            count,
            last_message_id,
        }
    }
}

/// Discriminant used to register handlers for one class of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Aggregate unread counter pushed by the server.
    UnreadUpdated,
    /// New-message notification from the live stream.
    MessageCreated,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnreadUpdated => write!(f, "unread_updated"),
            Self::MessageCreated => write!(f, "message_created"),
        }
    }
}

/// Events delivered by the live event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Server-pushed unread counter.
    UnreadUpdated(UnreadEvent),
    /// New-message notification.
    MessageCreated(CandidateMessage),
}

impl ClientEvent {
    /// Kind used to route this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::UnreadUpdated(_) => EventKind::UnreadUpdated,
            Self::MessageCreated(_) => EventKind::MessageCreated,
        }
    }
}
