//! Inbound message values used for read tracking.

use serde::{Deserialize, Serialize};

use super::{ConversationId, MessageId, ReadTarget, UserId};

/// One inbound new-message notification under consideration for read tracking.
///
/// Built once per notification and consumed synchronously; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMessage {
    /// Message identifier.
    pub message_id: MessageId,
    /// Channel the message was posted in.
    pub conversation_id: ConversationId,
    /// Parent message when the message belongs to a thread.
    #[serde(default)]
    pub reply_to: Option<MessageId>,
    /// Author of the message.
    pub author_id: UserId,
    /// Set when the notification is an edit of an existing message.
    #[serde(default)]
    pub is_update: bool,
    /// Set when the notification reports a deletion.
    #[serde(default)]
    pub is_deleted: bool,
    /// Number of replies to this message.
    #[serde(default)]
    pub reply_count: u32,
}

impl CandidateMessage {
    /// Creates a fresh, top-level message notification.
    #[must_use]
    pub fn new(
        message_id: impl Into<MessageId>,
        conversation_id: impl Into<ConversationId>,
        author_id: impl Into<UserId>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            conversation_id: conversation_id.into(),
            reply_to: None,
            author_id: author_id.into(),
            is_update: false,
            is_deleted: false,
            reply_count: 0,
        }
    }

    /// Marks the message as a reply in the thread under `parent_id`.
    #[must_use]
    pub fn in_thread(mut self, parent_id: impl Into<MessageId>) -> Self {
        self.reply_to = Some(parent_id.into());
        self
    }

    /// Marks the notification as an edit.
    #[must_use]
    pub const fn updated(mut self) -> Self {
        self.is_update = true;
        self
    }

    /// Marks the notification as a deletion.
    #[must_use]
    pub const fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    /// Sets the reply count.
    #[must_use]
    pub const fn with_reply_count(mut self, count: u32) -> Self {
        self.reply_count = count;
        self
    }

    /// Thread when `reply_to` is set, channel otherwise.
    #[must_use]
    pub fn target(&self) -> ReadTarget {
        ReadTarget::of(&self.conversation_id, self.reply_to.as_ref())
    }

    /// Reference to this message for user actions.
    #[must_use]
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            message_id: self.message_id.clone(),
            conversation_id: self.conversation_id.clone(),
            reply_to: self.reply_to.clone(),
        }
    }
}

/// A message the user acted on, e.g. by clicking it to toggle read state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    /// Clicked message.
    pub message_id: MessageId,
    /// Channel the message was posted in.
    pub conversation_id: ConversationId,
    /// Parent message when the message is a thread reply.
    #[serde(default)]
    pub reply_to: Option<MessageId>,
}

impl MessageRef {
    /// Creates a reference to a top-level message.
    #[must_use]
    pub fn new(
        message_id: impl Into<MessageId>,
        conversation_id: impl Into<ConversationId>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            conversation_id: conversation_id.into(),
            reply_to: None,
        }
    }

    /// Places the message in the thread under `parent_id`.
    #[must_use]
    pub fn in_thread(mut self, parent_id: impl Into<MessageId>) -> Self {
        self.reply_to = Some(parent_id.into());
        self
    }

    /// Channel or thread the message belongs to.
    #[must_use]
    pub fn target(&self) -> ReadTarget {
        ReadTarget::of(&self.conversation_id, self.reply_to.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_defaults_to_new_content() {
        let message = CandidateMessage::new("m1", "c1", "u2");

        assert!(!message.is_update);
        assert!(!message.is_deleted);
        assert_eq!(message.reply_count, 0);
        assert_eq!(message.target(), ReadTarget::Channel { channel_id: "c1".into() });
    }

    #[test]
    fn test_message_ref_keeps_thread_routing() {
        let message = CandidateMessage::new("m2", "c1", "u2").in_thread("m1");
        let reference = message.message_ref();

        assert_eq!(reference.target(), message.target());
        assert!(reference.target().is_thread());
    }

    #[test]
    fn test_candidate_deserializes_with_optional_flags() {
        let message: CandidateMessage = serde_json::from_str(
            r#"{"message_id":"m5","conversation_id":"c1","author_id":"u3","reply_to":"m1"}"#,
        )
        .unwrap();

        assert_eq!(message.reply_to, Some(MessageId::from("m1")));
        assert!(!message.is_update);
    }
}
