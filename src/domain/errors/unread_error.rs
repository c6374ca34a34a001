//! Unread reconciliation error types.

use thiserror::Error;

use super::GatewayError;
use crate::domain::entities::ConversationId;

/// Unread reconciliation error variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnreadError {
    /// A mutation referenced a conversation that was never loaded. This points
    /// at an ordering problem upstream, e.g. an unread push before the list load.
    #[error("could not find conversation (conversation_id: {conversation_id})")]
    UnknownConversation {
        /// Conversation the mutation asked for.
        conversation_id: ConversationId,
    },

    /// The backend round trip failed; local state was left untouched.
    #[error("backend gateway failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl UnreadError {
    /// Creates unknown conversation error.
    #[must_use]
    pub fn unknown(conversation_id: ConversationId) -> Self {
        Self::UnknownConversation { conversation_id }
    }

    /// Returns whether this is a local consistency error.
    #[must_use]
    pub const fn is_consistency_error(&self) -> bool {
        matches!(self, Self::UnknownConversation { .. })
    }

    /// Returns whether this is a transport error.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let consistency = UnreadError::unknown("c1".into());
        let transport = UnreadError::from(GatewayError::network("connection reset"));

        assert!(consistency.is_consistency_error());
        assert!(!consistency.is_transport_error());
        assert!(transport.is_transport_error());
        assert!(!transport.is_consistency_error());
    }

    #[test]
    fn test_display_names_conversation() {
        let err = UnreadError::unknown("c42".into());
        assert_eq!(
            err.to_string(),
            "could not find conversation (conversation_id: c42)"
        );
    }
}
