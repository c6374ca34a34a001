//! Routes unread-related events into the marker and the store.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::deferred_read_marker::DeferredReadMarker;
use super::event_dispatcher::{EventDispatcher, SubscriptionId};
use super::unread_store::{ToggleOutcome, UnreadStore};
use crate::domain::entities::{CandidateMessage, MessageRef, ReadTarget, UnreadSummary, UserId};
use crate::domain::errors::UnreadError;
use crate::domain::events::{ClientEvent, EventKind, UnreadEvent};

/// Why a new-message notification is not new unread content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Edit of an existing message.
    Updated,
    /// Deletion notice.
    Deleted,
    /// Parent message whose reply count changed.
    ReplyCountBump,
    /// The server already marked the user's own messages read.
    OwnMessage,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Updated => write!(f, "updated message"),
            Self::Deleted => write!(f, "deleted message"),
            Self::ReplyCountBump => write!(f, "reply count update"),
            Self::OwnMessage => write!(f, "own message"),
        }
    }
}

/// Returns why `message` must not reach the read marker, if it must not.
#[must_use]
pub fn skip_reason(message: &CandidateMessage, current_user: &UserId) -> Option<SkipReason> {
    if message.is_update {
        Some(SkipReason::Updated)
    } else if message.is_deleted {
        Some(SkipReason::Deleted)
    } else if message.reply_count > 0 {
        Some(SkipReason::ReplyCountBump)
    } else if message.author_id == *current_user {
        Some(SkipReason::OwnMessage)
    } else {
        None
    }
}

/// Returns whether `message` is new unread content for `current_user`.
#[must_use]
pub fn should_track(message: &CandidateMessage, current_user: &UserId) -> bool {
    skip_reason(message, current_user).is_none()
}

/// Subscribes to the live event classes and dispatches them with the
/// filtering rules applied; also entry point for user read actions.
#[derive(Clone)]
pub struct UnreadRouter {
    current_user: UserId,
    store: Arc<UnreadStore>,
    marker: DeferredReadMarker,
    subscriptions: Arc<Mutex<Vec<SubscriptionId>>>,
}

impl UnreadRouter {
    /// Creates a stopped router. Call [`UnreadRouter::start`] to subscribe.
    #[must_use]
    pub fn new(current_user: UserId, store: Arc<UnreadStore>, marker: DeferredReadMarker) -> Self {
        Self {
            current_user,
            store,
            marker,
            subscriptions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers the unread and new-message handlers. No-op if already started.
    pub fn start(&self, dispatcher: &EventDispatcher) {
        let mut subscriptions = self.subscriptions.lock();
        if !subscriptions.is_empty() {
            debug!("Unread router already started");
            return;
        }

        let router = self.clone();
        subscriptions.push(dispatcher.subscribe(EventKind::UnreadUpdated, move |event| {
            if let ClientEvent::UnreadUpdated(unread) = event {
                let _ = router.handle_unread_event(unread);
            }
        }));

        let router = self.clone();
        subscriptions.push(dispatcher.subscribe(EventKind::MessageCreated, move |event| {
            if let ClientEvent::MessageCreated(message) = event {
                router.handle_new_message(message);
            }
        }));

        debug!(user_id = %self.current_user, "Unread router started");
    }

    /// Deregisters the handlers and cancels any pending deferred read.
    pub fn stop(&self, dispatcher: &EventDispatcher) {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        for id in subscriptions {
            dispatcher.unsubscribe(id);
        }
        self.marker.cancel();
        debug!("Unread router stopped");
    }

    /// Returns whether the handlers are registered.
    #[must_use]
    pub fn is_started(&self) -> bool {
        !self.subscriptions.lock().is_empty()
    }

    /// Applies a server-pushed unread counter.
    ///
    /// # Errors
    /// Returns [`UnreadError::UnknownConversation`] if the conversation was
    /// not loaded yet.
    pub fn handle_unread_event(&self, event: &UnreadEvent) -> Result<UnreadSummary, UnreadError> {
        self.store
            .apply_server_unread(
                &event.target.conversation_id(),
                event.count,
                event.last_message_id.clone(),
            )
            .inspect_err(|e| warn!(read_target = %event.target, error = %e, "Unread event not applied"))
    }

    /// Forwards a new-message notification to the read marker unless it is
    /// filtered out. Returns whether it was forwarded.
    pub fn handle_new_message(&self, message: &CandidateMessage) -> bool {
        if let Some(reason) = skip_reason(message, &self.current_user) {
            debug!(message_id = %message.message_id, %reason, "Ignoring message for unread tracking");
            return false;
        }

        self.marker.on_candidate_message(message);
        true
    }

    /// User clicked a message to toggle its read state.
    ///
    /// # Errors
    /// See [`UnreadStore::toggle_message_read`].
    pub async fn toggle_message_read(
        &self,
        message: &MessageRef,
    ) -> Result<ToggleOutcome, UnreadError> {
        self.store.toggle_message_read(message).await
    }

    /// "Mark all read" affordance.
    ///
    /// # Errors
    /// See [`UnreadStore::mark_conversation_read`].
    pub async fn mark_read(&self, target: &ReadTarget) -> Result<UnreadSummary, UnreadError> {
        self.store.clear_unread(target).await
    }

    /// Unread store the router writes to.
    #[must_use]
    pub const fn store(&self) -> &Arc<UnreadStore> {
        &self.store
    }

    /// Read marker fed by new messages.
    #[must_use]
    pub const fn marker(&self) -> &DeferredReadMarker {
        &self.marker
    }
}
