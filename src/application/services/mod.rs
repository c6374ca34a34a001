//! Unread tracking services.

/// Focus-aware deferred mark-as-read.
pub mod deferred_read_marker;
/// Typed event dispatch.
pub mod event_dispatcher;
/// Window focus tracking.
pub mod focus_monitor;
/// Read intent consumer.
pub mod read_intent_worker;
/// Live event routing.
pub mod unread_router;
/// Unread reconciliation store.
pub mod unread_store;

pub use deferred_read_marker::{DEFAULT_FOCUS_DELAY, DeferredReadMarker, ReadIntent};
pub use event_dispatcher::{EventDispatcher, SubscriptionId};
pub use focus_monitor::FocusMonitor;
pub use read_intent_worker::ReadIntentWorker;
pub use unread_router::{SkipReason, UnreadRouter, should_track, skip_reason};
pub use unread_store::{ToggleOutcome, UnreadStore};
