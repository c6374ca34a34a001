//! Turns deferred-marker intents into store reconciliation calls.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::deferred_read_marker::ReadIntent;
use super::unread_store::UnreadStore;

/// Consumes [`ReadIntent`]s and marks their conversations read.
pub struct ReadIntentWorker {
    store: Arc<UnreadStore>,
    intent_rx: mpsc::UnboundedReceiver<ReadIntent>,
}

impl ReadIntentWorker {
    /// Creates a worker draining `intent_rx` into `store`.
    #[must_use]
    pub const fn new(
        store: Arc<UnreadStore>,
        intent_rx: mpsc::UnboundedReceiver<ReadIntent>,
    ) -> Self {
        Self { store, intent_rx }
    }

    /// Runs until every sender is gone. Each intent is reconciled on its own
    /// task so a slow round trip does not hold back the next one.
    pub async fn run(mut self) {
        info!("Read intent worker started");
        while let Some(intent) = self.intent_rx.recv().await {
            let store = self.store.clone();
            tokio::spawn(async move { Self::handle_intent(&store, intent).await });
        }
        info!("Read intent worker stopped");
    }

    /// Spawns [`ReadIntentWorker::run`] on the current runtime.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Reconciles every intent queued right now, one after another.
    /// Returns the number handled.
    pub async fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(intent) = self.intent_rx.try_recv() {
            Self::handle_intent(&self.store, intent).await;
            handled += 1;
        }
        handled
    }

    async fn handle_intent(store: &UnreadStore, intent: ReadIntent) {
        debug!(read_target = %intent.target, message_id = %intent.message_id, "Handling read intent");
        if let Err(e) = store.mark_conversation_read(&intent.target).await {
            warn!(read_target = %intent.target, error = %e, "Deferred mark-as-read failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Conversation, ReadTarget, UnreadSummary};
    use crate::domain::errors::GatewayError;
    use crate::domain::ports::mocks::MockBackend;

    fn intent(channel: &str, message: &str) -> ReadIntent {
        ReadIntent {
            target: ReadTarget::Channel {
                channel_id: channel.into(),
            },
            message_id: message.into(),
        }
    }

    fn store_with(backend: Arc<MockBackend>) -> Arc<UnreadStore> {
        let store = Arc::new(UnreadStore::new(backend));
        store.upsert(Conversation::channel("c1").with_unread(UnreadSummary::new(4, None)));
        store
    }

    #[tokio::test]
    async fn test_drain_marks_conversations_read() {
        let backend = Arc::new(MockBackend::new());
        backend.respond(UnreadSummary::new(0, Some("m9".into())));
        let store = store_with(backend.clone());
        let (tx, rx) = mpsc::unbounded_channel();
        let mut worker = ReadIntentWorker::new(store.clone(), rx);

        tx.send(intent("c1", "m9")).unwrap();

        assert_eq!(worker.drain().await, 1);
        assert_eq!(store.unread(&"c1".into()), Some(UnreadSummary::new(0, Some("m9".into()))));
        assert_eq!(backend.calls()[0].last_read, None);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_worker() {
        let backend = Arc::new(MockBackend::new());
        backend.fail(GatewayError::server(503, "unavailable"));
        let store = store_with(backend.clone());
        let (tx, rx) = mpsc::unbounded_channel();
        let mut worker = ReadIntentWorker::new(store.clone(), rx);

        tx.send(intent("c1", "m1")).unwrap();
        tx.send(intent("c1", "m2")).unwrap();

        assert_eq!(worker.drain().await, 2);
        assert_eq!(backend.call_count(), 2);
        assert_eq!(store.unread_count(&"c1".into()), Some(0));
    }

    #[tokio::test]
    async fn test_run_stops_when_senders_drop() {
        let backend = Arc::new(MockBackend::new());
        let store = store_with(backend.clone());
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ReadIntentWorker::new(store, rx).spawn();

        tx.send(intent("c1", "m1")).unwrap();
        drop(tx);
        handle.await.unwrap();

        for _ in 0..10 {
            if backend.call_count() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn test_run_waits_for_intents() {
        let store = store_with(Arc::new(MockBackend::new()));
        let (tx, rx) = mpsc::unbounded_channel();
        let mut run = tokio_test::task::spawn(ReadIntentWorker::new(store, rx).run());

        tokio_test::assert_pending!(run.poll());

        drop(tx);
        assert!(run.is_woken());
        tokio_test::assert_ready!(run.poll());
    }
}
