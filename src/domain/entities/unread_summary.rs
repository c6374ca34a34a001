//! Unread summary entity.

use serde::{Deserialize, Serialize};

use super::MessageId;

/// Unread state of one conversation for the current user.
///
/// `count` is only meaningful relative to `last_message_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadSummary {
    /// Number of unread messages.
    #[serde(default)]
    pub count: u32,
    /// Last message considered read, `None` when nothing was marked yet.
    #[serde(default)]
    pub last_message_id: Option<MessageId>,
}

impl UnreadSummary {
    /// Creates a new summary.
    #[must_use]
    pub const fn new(count: u32, last_message_id: Option<MessageId>) -> Self {
        Self {
            count,
            last_message_id,
        }
    }

    /// Returns whether there is anything unread.
    #[must_use]
    pub const fn has_unread(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_unread() {
        assert!(!UnreadSummary::default().has_unread());
        assert!(!UnreadSummary::new(0, Some("m1".into())).has_unread());
        assert!(UnreadSummary::new(2, Some("m1".into())).has_unread());
    }
}
