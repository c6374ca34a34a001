//! Conversation entity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ConversationId, MessageId, ReadTarget, UnreadSummary, UserId};

/// Whether a conversation is a channel or a thread scoped under a parent message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationKind {
    /// Top-level channel.
    #[default]
    Channel,
    /// Replies under `parent_id` in `channel_id`.
    Thread {
        /// Channel the thread lives in.
        channel_id: ConversationId,
        /// Message the thread replies to.
        parent_id: MessageId,
    },
}

/// A channel or thread as known to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    #[serde(default)]
    kind: ConversationKind,
    #[serde(default)]
    members: HashSet<UserId>,
    #[serde(default)]
    unread: UnreadSummary,
}

impl Conversation {
    /// Creates a channel conversation with nothing unread.
    #[must_use]
    pub fn channel(id: impl Into<ConversationId>) -> Self {
        Self {
            id: id.into(),
            kind: ConversationKind::Channel,
            members: HashSet::new(),
            unread: UnreadSummary::default(),
        }
    }

    /// Creates the thread conversation replying to `parent_id` in `channel_id`.
    #[must_use]
    pub fn thread(channel_id: impl Into<ConversationId>, parent_id: impl Into<MessageId>) -> Self {
        let channel_id = channel_id.into();
        let parent_id = parent_id.into();
        Self {
            id: ConversationId::thread(&channel_id, &parent_id),
            kind: ConversationKind::Thread {
                channel_id,
                parent_id,
            },
            members: HashSet::new(),
            unread: UnreadSummary::default(),
        }
    }

    /// Sets the member list.
    #[must_use]
    pub fn with_members<I, U>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initial unread state.
    #[must_use]
    pub fn with_unread(mut self, unread: UnreadSummary) -> Self {
        self.unread = unread;
        self
    }

    /// Store key.
    #[must_use]
    pub const fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Channel or thread.
    #[must_use]
    pub const fn kind(&self) -> &ConversationKind {
        &self.kind
    }

    /// Users in the conversation.
    #[must_use]
    pub const fn members(&self) -> &HashSet<UserId> {
        &self.members
    }

    /// Current unread state.
    #[must_use]
    pub const fn unread(&self) -> &UnreadSummary {
        &self.unread
    }

    /// Mutable access for the unread store; nothing else writes the summary.
    pub(crate) fn unread_mut(&mut self) -> &mut UnreadSummary {
        &mut self.unread
    }

    /// Returns whether this is a thread.
    #[must_use]
    pub fn is_thread(&self) -> bool {
        matches!(self.kind, ConversationKind::Thread { .. })
    }

    /// Read target addressing this conversation.
    #[must_use]
    pub fn target(&self) -> ReadTarget {
        match &self.kind {
            ConversationKind::Channel => ReadTarget::Channel {
                channel_id: self.id.clone(),
            },
            ConversationKind::Thread {
                channel_id,
                parent_id,
            } => ReadTarget::Thread {
                channel_id: channel_id.clone(),
                parent_id: parent_id.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_matches_target_key() {
        let thread = Conversation::thread("c1", "m4");

        assert!(thread.is_thread());
        assert_eq!(thread.target().conversation_id(), *thread.id());
    }

    #[test]
    fn test_members_are_order_irrelevant() {
        let a = Conversation::channel("c1").with_members(["u1", "u2"]);
        let b = Conversation::channel("c1").with_members(["u2", "u1"]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let conversation: Conversation = serde_json::from_str(r#"{"id":"c9"}"#).unwrap();

        assert_eq!(conversation.kind(), &ConversationKind::Channel);
        assert!(conversation.members().is_empty());
        assert_eq!(conversation.unread(), &UnreadSummary::default());
    }
}
