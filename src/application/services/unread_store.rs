//! Per-conversation unread state, reconciled against the backend.
//!
//! Server-confirmed values always overwrite local estimates. Round trips for
//! different conversations may overlap; for the same conversation the last
//! response to land wins, and the next authoritative push corrects any
//! regression.
//!
//! The toggle slot belongs to the store alone; deferred reads from the
//! marker do not touch it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::entities::{
    Conversation, ConversationId, MessageId, MessageRef, ReadTarget, UnreadSummary,
};
use crate::domain::errors::UnreadError;
use crate::domain::ports::BackendPort;

/// How a mutation changes the unread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountChange {
    /// Authoritative overwrite.
    Set(u32),
    /// Local optimistic adjustment.
    Delta(i64),
}

/// Result of a toggle-read user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Same message clicked twice: the whole conversation was marked read.
    MarkedAll(UnreadSummary),
    /// Conversation marked read up to the clicked message.
    MarkedUpTo {
        /// Clicked message, now the tracked toggle id.
        message_id: MessageId,
        /// Server-confirmed state.
        summary: UnreadSummary,
    },
}

impl ToggleOutcome {
    /// Server-confirmed state after the action.
    #[must_use]
    pub const fn summary(&self) -> &UnreadSummary {
        match self {
            Self::MarkedAll(summary) | Self::MarkedUpTo { summary, .. } => summary,
        }
    }
}

/// Keeps the in-flight counter raised for the lifetime of a round trip.
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Unread reconciliation store.
///
/// Records are only mutated through the operations below; callers never
/// write `count` or `last_message_id` directly.
pub struct UnreadStore {
    backend: Arc<dyn BackendPort>,
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
    in_flight: AtomicUsize,
    // Single slot for the whole session, not per conversation.
    last_toggled: Mutex<Option<MessageId>>,
}

impl UnreadStore {
    /// Creates an empty store. Call [`UnreadStore::load`] to populate it.
    #[must_use]
    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self {
            backend,
            conversations: RwLock::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            last_toggled: Mutex::new(None),
        }
    }

    /// Replaces all records with the backend's conversation list.
    ///
    /// # Errors
    /// Returns the gateway error; existing records are kept on failure.
    pub async fn load(&self) -> Result<usize, UnreadError> {
        let conversations = {
            let _pending = PendingGuard::enter(&self.in_flight);
            self.backend.list_conversations().await.map_err(|e| {
                warn!(error = %e, "Failed to load conversations");
                UnreadError::from(e)
            })?
        };

        let count = conversations.len();
        *self.conversations.write() = conversations
            .into_iter()
            .map(|c| (c.id().clone(), c))
            .collect();

        info!(count, "Loaded conversations");
        Ok(count)
    }

    /// Inserts a record or replaces the one with the same id.
    pub fn upsert(&self, conversation: Conversation) {
        self.conversations
            .write()
            .insert(conversation.id().clone(), conversation);
    }

    /// Removes a record. Returns the removed conversation.
    pub fn remove(&self, conversation_id: &ConversationId) -> Option<Conversation> {
        self.conversations.write().remove(conversation_id)
    }

    /// Authoritative overwrite of the unread count.
    ///
    /// `last_message_id` of `None` leaves the recorded last-read message as is.
    ///
    /// # Errors
    /// Returns [`UnreadError::UnknownConversation`] if no record exists.
    pub fn apply_server_unread(
        &self,
        conversation_id: &ConversationId,
        count: u32,
        last_message_id: Option<MessageId>,
    ) -> Result<UnreadSummary, UnreadError> {
        self.change_unread(conversation_id, CountChange::Set(count), last_message_id)
    }

    /// Local optimistic adjustment, `count += delta`, floored at zero.
    ///
    /// # Errors
    /// Returns [`UnreadError::UnknownConversation`] if no record exists.
    pub fn apply_delta(
        &self,
        conversation_id: &ConversationId,
        delta: i64,
        last_message_id: Option<MessageId>,
    ) -> Result<UnreadSummary, UnreadError> {
        self.change_unread(conversation_id, CountChange::Delta(delta), last_message_id)
    }

    fn change_unread(
        &self,
        conversation_id: &ConversationId,
        change: CountChange,
        last_message_id: Option<MessageId>,
    ) -> Result<UnreadSummary, UnreadError> {
        let mut conversations = self.conversations.write();
        let conversation = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| UnreadError::unknown(conversation_id.clone()))?;

        let unread = conversation.unread_mut();
        unread.count = match change {
            CountChange::Set(count) => count,
            CountChange::Delta(delta) => {
                let next = (i64::from(unread.count) + delta).max(0);
                u32::try_from(next).unwrap_or(u32::MAX)
            }
        };
        if let Some(message_id) = last_message_id {
            unread.last_message_id = Some(message_id);
        }

        debug!(
            conversation_id = %conversation_id,
            ?change,
            count = unread.count,
            last_message_id = ?unread.last_message_id,
            "Unread changed"
        );
        Ok(unread.clone())
    }

    /// Marks the whole channel or thread read and applies the server's answer.
    ///
    /// # Errors
    /// Returns a transport error if the backend call fails, or a consistency
    /// error if the conversation is not loaded.
    pub async fn mark_conversation_read(
        &self,
        target: &ReadTarget,
    ) -> Result<UnreadSummary, UnreadError> {
        self.reconcile(target, None).await
    }

    /// Marks everything up to and including `message_id` read.
    ///
    /// # Errors
    /// Same as [`UnreadStore::mark_conversation_read`].
    pub async fn mark_message_read(
        &self,
        target: &ReadTarget,
        message_id: &MessageId,
    ) -> Result<UnreadSummary, UnreadError> {
        self.reconcile(target, Some(message_id)).await
    }

    /// Clears unread state for a "mark all read" affordance.
    ///
    /// # Errors
    /// Same as [`UnreadStore::mark_conversation_read`].
    pub async fn clear_unread(&self, target: &ReadTarget) -> Result<UnreadSummary, UnreadError> {
        self.mark_conversation_read(target).await
    }

    async fn reconcile(
        &self,
        target: &ReadTarget,
        last_read: Option<&MessageId>,
    ) -> Result<UnreadSummary, UnreadError> {
        let summary = {
            let _pending = PendingGuard::enter(&self.in_flight);
            match self.backend.mark_as_read(target, last_read).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(read_target = %target, error = %e, "Failed to mark as read");
                    return Err(e.into());
                }
            }
        };

        let applied = self
            .apply_server_unread(
                &target.conversation_id(),
                summary.count,
                summary.last_message_id,
            )
            .inspect_err(|e| warn!(read_target = %target, error = %e, "Mark-as-read answer not applied"))?;

        info!(
            read_target = %target,
            count = applied.count,
            last_message_id = ?applied.last_message_id,
            "Marked as read"
        );
        Ok(applied)
    }

    /// Click-to-toggle read state on a message.
    ///
    /// Clicking the tracked message again marks the whole conversation read
    /// and clears the tracked id; any other message marks read up to itself
    /// and becomes the tracked id. The tracked id is updated before the round
    /// trip, so it reflects the user's last click even if the call fails.
    ///
    /// # Errors
    /// Same as [`UnreadStore::mark_conversation_read`].
    pub async fn toggle_message_read(
        &self,
        message: &MessageRef,
    ) -> Result<ToggleOutcome, UnreadError> {
        let target = message.target();
        let undo = {
            let mut last_toggled = self.last_toggled.lock();
            if last_toggled.as_ref() == Some(&message.message_id) {
                *last_toggled = None;
                true
            } else {
                *last_toggled = Some(message.message_id.clone());
                false
            }
        };

        if undo {
            debug!(read_target = %target, "Marking all as read");
            let summary = self.mark_conversation_read(&target).await?;
            Ok(ToggleOutcome::MarkedAll(summary))
        } else {
            debug!(read_target = %target, message_id = %message.message_id, "Marking message as read");
            let summary = self.mark_message_read(&target, &message.message_id).await?;
            Ok(ToggleOutcome::MarkedUpTo {
                message_id: message.message_id.clone(),
                summary,
            })
        }
    }

    /// Message tracked by the last toggle action.
    #[must_use]
    pub fn last_toggled(&self) -> Option<MessageId> {
        self.last_toggled.lock().clone()
    }

    /// Returns whether at least one backend round trip is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Unread state of one conversation.
    #[must_use]
    pub fn unread(&self, conversation_id: &ConversationId) -> Option<UnreadSummary> {
        self.conversations
            .read()
            .get(conversation_id)
            .map(|c| c.unread().clone())
    }

    /// Unread count of one conversation.
    #[must_use]
    pub fn unread_count(&self, conversation_id: &ConversationId) -> Option<u32> {
        self.unread(conversation_id).map(|u| u.count)
    }

    /// Last read message of one conversation.
    #[must_use]
    pub fn last_read_message_id(&self, conversation_id: &ConversationId) -> Option<MessageId> {
        self.unread(conversation_id)
            .and_then(|u| u.last_message_id)
    }

    /// Snapshot of one record.
    #[must_use]
    pub fn conversation(&self, conversation_id: &ConversationId) -> Option<Conversation> {
        self.conversations.read().get(conversation_id).cloned()
    }

    /// Snapshot of all records, ordered by id.
    #[must_use]
    pub fn conversations(&self) -> Vec<Conversation> {
        let mut list: Vec<_> = self.conversations.read().values().cloned().collect();
        list.sort_by(|a, b| a.id().cmp(b.id()));
        list
    }

    /// Sum of unread counts over all conversations.
    #[must_use]
    pub fn total_unread(&self) -> u64 {
        self.conversations
            .read()
            .values()
            .map(|c| u64::from(c.unread().count))
            .sum()
    }
}
