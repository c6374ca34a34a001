//! Backend gateway port.

use async_trait::async_trait;

use crate::domain::entities::{Conversation, MessageId, ReadTarget, UnreadSummary};
use crate::domain::errors::GatewayError;

/// Request/response RPCs the unread core needs from the backend.
#[async_trait]
pub trait BackendPort: Send + Sync {
    /// Lists every conversation visible to the current user.
    async fn list_conversations(&self) -> Result<Vec<Conversation>, GatewayError>;

    /// Marks `target` as read, up to and including `last_read` when given,
    /// fully otherwise. Returns the authoritative unread state afterwards.
    async fn mark_as_read(
        &self,
        target: &ReadTarget,
        last_read: Option<&MessageId>,
    ) -> Result<UnreadSummary, GatewayError>;
}
