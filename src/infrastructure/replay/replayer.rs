//! Replays a recorded session against the unread core.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::script::{ReplayScript, ReplayStep};
use crate::application::services::{
    DeferredReadMarker, EventDispatcher, FocusMonitor, ReadIntentWorker, UnreadRouter,
    UnreadStore, should_track,
};
use crate::domain::entities::{CandidateMessage, Conversation, MessageId, UserId};
use crate::domain::errors::UnreadError;
use crate::domain::events::ClientEvent;
use crate::infrastructure::backend::InMemoryBackend;
use crate::infrastructure::viewport::Viewport;

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Every conversation, ordered by id.
    pub conversations: Vec<Conversation>,
    /// Sum of all unread counts.
    pub total_unread: u64,
    /// Message tracked by the toggle action, if any.
    pub last_toggled: Option<MessageId>,
    /// Steps whose user action was rejected.
    pub failed_steps: usize,
}

/// Wires the services together around an [`InMemoryBackend`].
pub struct Replayer {
    current_user: UserId,
    focus_delay: Duration,
}

impl Replayer {
    /// `current_user` applies unless the script names its own user.
    #[must_use]
    pub const fn new(current_user: UserId, focus_delay: Duration) -> Self {
        Self {
            current_user,
            focus_delay,
        }
    }

    /// Runs every step of `script` in order.
    ///
    /// # Errors
    /// Returns an error only if the initial conversation load fails; step
    /// failures are logged and counted in the report.
    pub async fn run(&self, script: ReplayScript) -> Result<ReplayReport, UnreadError> {
        let current_user = script
            .current_user
            .unwrap_or_else(|| self.current_user.clone());

        let backend = Arc::new(InMemoryBackend::new(script.conversations));
        let store = Arc::new(UnreadStore::new(backend.clone()));
        store.load().await?;

        let focus = Arc::new(FocusMonitor::new(script.focused));
        let viewport = Arc::new(Viewport::new(script.following));
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let marker = DeferredReadMarker::with_delay(
            focus.clone(),
            viewport.clone(),
            intent_tx,
            self.focus_delay,
        );
        let mut worker = ReadIntentWorker::new(store.clone(), intent_rx);

        let dispatcher = EventDispatcher::new();
        let router = UnreadRouter::new(current_user.clone(), store.clone(), marker);
        router.start(&dispatcher);

        info!(steps = script.steps.len(), user_id = %current_user, "Replaying session");

        let mut failed_steps = 0;
        for (index, step) in script.steps.into_iter().enumerate() {
            debug!(index, ?step, "Replaying step");
            let result = match step {
                ReplayStep::Focus { focused } => {
                    focus.set_focused(focused);
                    Ok(())
                }
                ReplayStep::Follow { target } => {
                    match target {
                        Some(target) => viewport.open(target),
                        None => viewport.close(),
                    }
                    Ok(())
                }
                ReplayStep::NewMessage(message) => {
                    let posted = Self::post(&backend, &store, &current_user, &message);
                    dispatcher.dispatch(&ClientEvent::MessageCreated(message));
                    posted
                }
                ReplayStep::UnreadPush(event) => {
                    dispatcher.dispatch(&ClientEvent::UnreadUpdated(event));
                    Ok(())
                }
                ReplayStep::Toggle(message) => router.toggle_message_read(&message).await.map(drop),
                ReplayStep::MarkRead { target } => router.mark_read(&target).await.map(drop),
                ReplayStep::Wait { ms } => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    // Timers due at the same instant run before the drain.
                    for _ in 0..2 {
                        tokio::task::yield_now().await;
                    }
                    Ok(())
                }
            };

            if let Err(e) = result {
                warn!(
                    index,
                    error = %e,
                    consistency = e.is_consistency_error(),
                    "Replay step failed"
                );
                failed_steps += 1;
            }
            worker.drain().await;
        }

        router.stop(&dispatcher);

        Ok(ReplayReport {
            conversations: store.conversations(),
            total_unread: store.total_unread(),
            last_toggled: store.last_toggled(),
            failed_steps,
        })
    }

    /// Records a posted message server side and bumps the local estimate.
    ///
    /// Fails when the message belongs to a conversation that was never loaded.
    fn post(
        backend: &InMemoryBackend,
        store: &UnreadStore,
        current_user: &UserId,
        message: &CandidateMessage,
    ) -> Result<(), UnreadError> {
        if message.is_update || message.is_deleted {
            return Ok(());
        }
        let target = message.target();
        backend.record_message(&target, message.message_id.clone());

        if should_track(message, current_user) {
            store.apply_delta(&target.conversation_id(), 1, None)?;
        }
        Ok(())
    }
}
