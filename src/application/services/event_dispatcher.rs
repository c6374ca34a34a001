//! Typed event dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::events::{ClientEvent, EventKind};

/// Handle returned by [`EventDispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&ClientEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

/// Registers handlers per event kind and fans events out to them.
///
/// Owners register on start and deregister on stop; nothing is global.
#[derive(Default)]
pub struct EventDispatcher {
    next_id: AtomicU64,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind`.
    pub fn subscribe(
        &self,
        kind: EventKind,
        handler: impl Fn(&ClientEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().push(Subscription {
            id,
            kind,
            handler: Arc::new(handler),
        });
        debug!(kind = %kind, ?id, "Handler subscribed");
        id
    }

    /// Removes a registration. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Delivers `event` to every handler registered for its kind, in
    /// registration order. Returns the number of handlers invoked.
    pub fn dispatch(&self, event: &ClientEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.handler.clone())
            .collect();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of handlers registered for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Dispatches events from a live stream until it closes.
    pub async fn run(&self, mut event_rx: mpsc::UnboundedReceiver<ClientEvent>) {
        info!("Event dispatcher started");
        while let Some(event) = event_rx.recv().await {
            let delivered = self.dispatch(&event);
            if delivered == 0 {
                debug!(kind = %event.kind(), "No handler for event");
            }
        }
        info!("Event dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CandidateMessage;
    use parking_lot::Mutex;

    fn new_message() -> ClientEvent {
        ClientEvent::MessageCreated(CandidateMessage::new("m1", "c1", "u1"))
    }

    #[test]
    fn test_dispatch_by_kind() {
        let dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        dispatcher.subscribe(EventKind::MessageCreated, move |e| sink.lock().push(e.kind()));
        dispatcher.subscribe(EventKind::UnreadUpdated, |_| panic!("wrong kind"));

        assert_eq!(dispatcher.dispatch(&new_message()), 1);
        assert_eq!(*seen.lock(), vec![EventKind::MessageCreated]);
    }

    #[test]
    fn test_unsubscribe() {
        let dispatcher = EventDispatcher::new();
        let id = dispatcher.subscribe(EventKind::MessageCreated, |_| {});

        assert_eq!(dispatcher.handler_count(EventKind::MessageCreated), 1);
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.dispatch(&new_message()), 0);
    }

    #[test]
    fn test_handler_may_unsubscribe_during_dispatch() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let slot = Arc::new(Mutex::new(None));

        let inner = dispatcher.clone();
        let own_id = slot.clone();
        let id = dispatcher.subscribe(EventKind::MessageCreated, move |_| {
            if let Some(id) = own_id.lock().take() {
                inner.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);

        assert_eq!(dispatcher.dispatch(&new_message()), 1);
        assert_eq!(dispatcher.handler_count(EventKind::MessageCreated), 0);
    }

    #[tokio::test]
    async fn test_run_drains_stream() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        dispatcher.subscribe(EventKind::MessageCreated, move |_| *sink.lock() += 1);

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(new_message()).unwrap();
        tx.send(new_message()).unwrap();
        drop(tx);
        dispatcher.run(rx).await;

        assert_eq!(*count.lock(), 2);
    }
}
