//! Read target routing.

use serde::{Deserialize, Serialize};

use super::{ConversationId, MessageId};

/// What a mark-as-read operation applies to: a whole channel or one thread in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReadTarget {
    /// Top-level channel.
    Channel {
        /// Channel conversation.
        channel_id: ConversationId,
    },
    /// Replies under `parent_id` in `channel_id`.
    Thread {
        /// Channel the thread lives in.
        channel_id: ConversationId,
        /// Message the thread replies to.
        parent_id: MessageId,
    },
}

impl ReadTarget {
    /// Picks the thread when `reply_to` is set, the channel otherwise.
    #[must_use]
    pub fn of(channel_id: &ConversationId, reply_to: Option<&MessageId>) -> Self {
        match reply_to {
            Some(parent_id) => Self::Thread {
                channel_id: channel_id.clone(),
                parent_id: parent_id.clone(),
            },
            None => Self::Channel {
                channel_id: channel_id.clone(),
            },
        }
    }

    /// Store key of the conversation this target addresses.
    #[must_use]
    pub fn conversation_id(&self) -> ConversationId {
        match self {
            Self::Channel { channel_id } => channel_id.clone(),
            Self::Thread {
                channel_id,
                parent_id,
            } => ConversationId::thread(channel_id, parent_id),
        }
    }

    /// Channel the target belongs to.
    #[must_use]
    pub const fn channel_id(&self) -> &ConversationId {
        match self {
            Self::Channel { channel_id } | Self::Thread { channel_id, .. } => channel_id,
        }
    }

    /// Returns whether this targets a thread.
    #[must_use]
    pub const fn is_thread(&self) -> bool {
        matches!(self, Self::Thread { .. })
    }
}

impl std::fmt::Display for ReadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Channel { channel_id } => write!(f, "channel {channel_id}"),
            Self::Thread {
                channel_id,
                parent_id,
            } => write!(f, "thread {parent_id} in {channel_id}"),
        }
    }
}
