//! Session script format.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::{CandidateMessage, Conversation, MessageRef, ReadTarget, UserId};
use crate::domain::events::UnreadEvent;

/// Script loading failures.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One recorded client interaction.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Window gains or loses focus.
    Focus { focused: bool },
    /// User opens a conversation, or closes the open one.
    Follow {
        #[serde(default)]
        target: Option<ReadTarget>,
    },
    /// Live new-message notification.
    NewMessage(CandidateMessage),
    /// Server-pushed unread counter.
    UnreadPush(UnreadEvent),
    /// User clicks a message.
    Toggle(MessageRef),
    /// User hits "mark all read".
    MarkRead { target: ReadTarget },
    /// Let time pass.
    Wait { ms: u64 },
}

/// A recorded session: initial state plus the steps to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Overrides the configured user when set.
    #[serde(default)]
    pub current_user: Option<UserId>,
    /// Whether the window starts focused.
    #[serde(default = "default_focused")]
    pub focused: bool,
    /// Conversation open at the start.
    #[serde(default)]
    pub following: Option<ReadTarget>,
    /// Conversations known to the backend.
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    /// Steps in replay order.
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

const fn default_focused() -> bool {
    true
}

impl ReplayScript {
    /// Parses a script from JSON text.
    ///
    /// # Errors
    /// Returns [`ScriptError::Parse`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a script file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }
}
