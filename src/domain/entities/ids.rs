//! Opaque identifiers.

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a channel or thread conversation.
    ConversationId
);

opaque_id!(
    /// Identifier of a single message.
    MessageId
);

opaque_id!(
    /// Identifier of a user.
    UserId
);

impl ConversationId {
    /// Separator between the channel and parent message parts of a thread key.
    pub const THREAD_SEPARATOR: char = '/';

    /// Derives the store key of the thread hanging off `parent_id` in `channel_id`.
    #[must_use]
    pub fn thread(channel_id: &Self, parent_id: &MessageId) -> Self {
        Self(format!(
            "{channel_id}{}{parent_id}",
            Self::THREAD_SEPARATOR
        ))
    }
}
