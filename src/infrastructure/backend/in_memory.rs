//! In-memory backend gateway.
//!
//! Keeps a per-conversation message log and answers mark-as-read requests
//! from it, the way the server would.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::entities::{Conversation, ConversationId, MessageId, ReadTarget, UnreadSummary};
use crate::domain::errors::GatewayError;
use crate::domain::ports::BackendPort;

/// [`BackendPort`] answering from seeded conversations and recorded messages.
#[derive(Default)]
pub struct InMemoryBackend {
    conversations: RwLock<Vec<Conversation>>,
    logs: RwLock<HashMap<ConversationId, Vec<MessageId>>>,
}

impl InMemoryBackend {
    /// Seeds the backend with `conversations` and empty message logs.
    #[must_use]
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations: RwLock::new(conversations),
            ..Self::default()
        }
    }

    /// Appends a posted message to the target's log.
    pub fn record_message(&self, target: &ReadTarget, message_id: MessageId) {
        self.logs
            .write()
            .entry(target.conversation_id())
            .or_default()
            .push(message_id);
    }

    fn knows(&self, conversation_id: &ConversationId) -> bool {
        self.conversations
            .read()
            .iter()
            .any(|c| c.id() == conversation_id)
    }

    fn seeded_last_read(&self, conversation_id: &ConversationId) -> Option<MessageId> {
        self.conversations
            .read()
            .iter()
            .find(|c| c.id() == conversation_id)
            .and_then(|c| c.unread().last_message_id.clone())
    }
}

#[async_trait]
impl BackendPort for InMemoryBackend {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, GatewayError> {
        Ok(self.conversations.read().clone())
    }

    async fn mark_as_read(
        &self,
        target: &ReadTarget,
        last_read: Option<&MessageId>,
    ) -> Result<UnreadSummary, GatewayError> {
        let conversation_id = target.conversation_id();
        if !self.knows(&conversation_id) {
            return Err(GatewayError::server(404, format!("unknown conversation {conversation_id}")));
        }

        let logs = self.logs.read();
        let log = logs.get(&conversation_id).map_or(&[][..], Vec::as_slice);

        let summary = match last_read {
            None => UnreadSummary::new(
                0,
                log.last()
                    .cloned()
                    .or_else(|| self.seeded_last_read(&conversation_id)),
            ),
            Some(message_id) => {
                let position = log.iter().position(|m| m == message_id).ok_or_else(|| {
                    GatewayError::server(404, format!("unknown message {message_id}"))
                })?;
                let remaining = u32::try_from(log.len() - position - 1).unwrap_or(u32::MAX);
                UnreadSummary::new(remaining, Some(message_id.clone()))
            }
        };

        debug!(read_target = %target, count = summary.count, "Answered mark-as-read");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> ReadTarget {
        ReadTarget::Channel {
            channel_id: "c1".into(),
        }
    }

    fn backend() -> InMemoryBackend {
        let backend = InMemoryBackend::new(vec![
            Conversation::channel("c1").with_unread(UnreadSummary::new(0, Some("m0".into()))),
        ]);
        for id in ["m1", "m2", "m3"] {
            backend.record_message(&channel(), id.into());
        }
        backend
    }

    #[tokio::test]
    async fn test_mark_all_reads_to_latest() {
        let summary = backend().mark_as_read(&channel(), None).await.unwrap();

        assert_eq!(summary, UnreadSummary::new(0, Some("m3".into())));
    }

    #[tokio::test]
    async fn test_mark_up_to_leaves_later_messages_unread() {
        let summary = backend()
            .mark_as_read(&channel(), Some(&"m1".into()))
            .await
            .unwrap();

        assert_eq!(summary, UnreadSummary::new(2, Some("m1".into())));
    }

    #[tokio::test]
    async fn test_empty_log_keeps_seeded_last_read() {
        let backend = InMemoryBackend::new(vec![
            Conversation::channel("c1").with_unread(UnreadSummary::new(5, Some("m0".into()))),
        ]);

        let summary = backend.mark_as_read(&channel(), None).await.unwrap();

        assert_eq!(summary, UnreadSummary::new(0, Some("m0".into())));
    }

    #[tokio::test]
    async fn test_unknown_conversation_or_message_is_rejected() {
        let backend = backend();
        let other = ReadTarget::Channel {
            channel_id: "nope".into(),
        };

        assert!(matches!(
            backend.mark_as_read(&other, None).await,
            Err(GatewayError::Server { status: 404, .. })
        ));
        assert!(backend
            .mark_as_read(&channel(), Some(&"m99".into()))
            .await
            .is_err());
    }
}
