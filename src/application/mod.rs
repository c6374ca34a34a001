//! Application layer with the unread tracking services.

/// Service implementations.
pub mod services;

pub use services::{
    DeferredReadMarker, EventDispatcher, FocusMonitor, ReadIntent, ReadIntentWorker, ToggleOutcome,
    UnreadRouter, UnreadStore,
};
