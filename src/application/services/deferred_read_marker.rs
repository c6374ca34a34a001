//! Focus-aware deferred mark-as-read.
//!
//! A surviving new message in the followed conversation is marked read right
//! away while the window has focus. Otherwise the marker waits for the window
//! to regain focus and then for [`DEFAULT_FOCUS_DELAY`], so a brief tab switch
//! does not clear unread state for content nobody looked at.
//!
//! The marker owns a single process-wide slot: a newer candidate message
//! always cancels the pending deferral of an older one, even when the two
//! belong to different conversations.
//!
//! The last resolved message is tracked here, apart from the store's toggle
//! slot, so a deferred resolve never resets the click-to-toggle undo state.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::focus_monitor::FocusMonitor;
use crate::domain::entities::{CandidateMessage, MessageId, ReadTarget};
use crate::domain::ports::FollowingPort;

/// Delay between focus regain and marking the conversation read.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(2000);

/// Request to mark a conversation fully read, emitted on resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadIntent {
    /// Channel or thread to mark read.
    pub target: ReadTarget,
    /// Message whose arrival triggered the intent.
    pub message_id: MessageId,
}

#[derive(Debug, Default)]
struct PendingSlot {
    generation: u64,
    timer: Option<JoinHandle<()>>,
    last_handled: Option<MessageId>,
}

struct Inner {
    focus: Arc<FocusMonitor>,
    following: Arc<dyn FollowingPort>,
    intent_tx: mpsc::UnboundedSender<ReadIntent>,
    delay: Duration,
    slot: Mutex<PendingSlot>,
}

/// Decides whether and when a candidate message marks its conversation read.
#[derive(Clone)]
pub struct DeferredReadMarker {
    inner: Arc<Inner>,
}

impl DeferredReadMarker {
    /// Creates a marker using [`DEFAULT_FOCUS_DELAY`].
    #[must_use]
    pub fn new(
        focus: Arc<FocusMonitor>,
        following: Arc<dyn FollowingPort>,
        intent_tx: mpsc::UnboundedSender<ReadIntent>,
    ) -> Self {
        Self::with_delay(focus, following, intent_tx, DEFAULT_FOCUS_DELAY)
    }

    /// Creates a marker waiting `delay` after focus regain.
    #[must_use]
    pub fn with_delay(
        focus: Arc<FocusMonitor>,
        following: Arc<dyn FollowingPort>,
        intent_tx: mpsc::UnboundedSender<ReadIntent>,
        delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                focus,
                following,
                intent_tx,
                delay,
                slot: Mutex::new(PendingSlot::default()),
            }),
        }
    }

    /// Handles a new message that already passed the router's filters.
    ///
    /// Resolves synchronously when the window has focus; otherwise arms a
    /// one-shot focus listener that starts the delay timer.
    pub fn on_candidate_message(&self, message: &CandidateMessage) {
        let generation = self.inner.supersede();
        let target = message.target();
        let message_id = message.message_id.clone();

        if self.inner.focus.has_focus() {
            debug!(message_id = %message_id, read_target = %target, "Window has focus, resolving now");
            self.inner.resolve(generation, &target, &message_id);
            return;
        }

        debug!(message_id = %message_id, read_target = %target, "Window unfocused, waiting for focus");
        let weak = Arc::downgrade(&self.inner);
        self.inner.focus.once_focused(move || {
            if let Some(inner) = weak.upgrade() {
                inner.arm(generation, target, message_id);
            }
        });
    }

    /// Cancels any pending timer and focus listener.
    pub fn cancel(&self) {
        self.inner.supersede();
    }

    /// Returns whether a deferred resolution is waiting on focus or on its timer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.slot.lock().timer.is_some() || self.inner.focus.has_pending()
    }

    /// Last message whose arrival marked its conversation read.
    #[must_use]
    pub fn last_handled(&self) -> Option<MessageId> {
        self.inner.slot.lock().last_handled.clone()
    }

    /// Configured focus delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

impl Inner {
    /// Invalidates whatever is pending and returns the new generation.
    fn supersede(&self) -> u64 {
        let generation = {
            let mut slot = self.slot.lock();
            if let Some(timer) = slot.timer.take() {
                debug!("Clearing pending deferred read timer");
                timer.abort();
            }
            slot.generation += 1;
            slot.generation
        };

        if self.focus.clear_pending() {
            debug!("Removed pending focus listener");
        }
        generation
    }

    fn arm(self: &Arc<Self>, generation: u64, target: ReadTarget, message_id: MessageId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("Focus regained outside of a runtime, deferred read dropped");
            return;
        };

        let mut slot = self.slot.lock();
        if slot.generation != generation {
            return;
        }

        debug!(message_id = %message_id, delay = ?self.delay, "Arming deferred read timer");
        let weak: Weak<Self> = Arc::downgrade(self);
        let deadline = tokio::time::Instant::now() + self.delay;
        let timer = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                inner.resolve(generation, &target, &message_id);
            }
        });

        if let Some(previous) = slot.timer.replace(timer) {
            previous.abort();
        }
    }

    fn resolve(&self, generation: u64, target: &ReadTarget, message_id: &MessageId) {
        {
            let mut slot = self.slot.lock();
            if slot.generation != generation {
                debug!(message_id = %message_id, "Deferred read superseded");
                return;
            }
            slot.timer = None;
        }

        if !self.following.is_following(target) {
            debug!(read_target = %target, "Not following, nothing to mark");
            return;
        }

        debug!(read_target = %target, message_id = %message_id, "Marking as read");
        let intent = ReadIntent {
            target: target.clone(),
            message_id: message_id.clone(),
        };
        if self.intent_tx.send(intent).is_err() {
            warn!(read_target = %target, "Read intent receiver dropped");
            return;
        }

        self.slot.lock().last_handled = Some(message_id.clone());
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(timer) = self.slot.get_mut().timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockFollowingPort;

    struct Harness {
        focus: Arc<FocusMonitor>,
        marker: DeferredReadMarker,
        intents: mpsc::UnboundedReceiver<ReadIntent>,
    }

    fn harness(focused: bool, following: bool) -> Harness {
        let mut port = MockFollowingPort::new();
        port.expect_is_following().return_const(following);

        let focus = Arc::new(FocusMonitor::new(focused));
        let (tx, intents) = mpsc::unbounded_channel();
        let marker = DeferredReadMarker::new(focus.clone(), Arc::new(port), tx);

        Harness {
            focus,
            marker,
            intents,
        }
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn message(id: &str) -> CandidateMessage {
        CandidateMessage::new(id, "c1", "u2")
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_immediately_when_focused() {
        let mut h = harness(true, true);

        h.marker.on_candidate_message(&message("m1"));

        let intent = h.intents.try_recv().expect("intent sent synchronously");
        assert_eq!(intent.target, ReadTarget::Channel { channel_id: "c1".into() });
        assert_eq!(intent.message_id, MessageId::from("m1"));
        assert_eq!(h.marker.last_handled(), Some(MessageId::from("m1")));
        assert!(!h.marker.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_following_is_noop() {
        let mut h = harness(true, false);

        h.marker.on_candidate_message(&message("m1"));

        assert!(h.intents.try_recv().is_err());
        assert_eq!(h.marker.last_handled(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_thread_reply_routes_to_thread() {
        let mut h = harness(true, true);

        h.marker
            .on_candidate_message(&CandidateMessage::new("m7", "c1", "u2").in_thread("m3"));

        let intent = h.intents.try_recv().unwrap();
        assert_eq!(
            intent.target,
            ReadTarget::Thread {
                channel_id: "c1".into(),
                parent_id: "m3".into(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unfocused_waits_for_focus_and_delay() {
        let mut h = harness(false, true);

        h.marker.on_candidate_message(&message("m1"));
        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(h.intents.try_recv().is_err());
        assert!(h.marker.is_pending());

        h.focus.set_focused(true);
        tokio::time::advance(Duration::from_millis(1999)).await;
        settle().await;
        assert!(h.intents.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        let intent = h.intents.try_recv().expect("intent after delay");
        assert_eq!(intent.message_id, MessageId::from("m1"));

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(h.intents.try_recv().is_err());
        assert!(!h.marker.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_of_many_unfocused_messages_resolves() {
        let mut h = harness(false, true);

        for id in ["m1", "m2", "m3", "m4"] {
            h.marker.on_candidate_message(&message(id));
        }
        h.focus.set_focused(true);
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;

        let intent = h.intents.try_recv().unwrap();
        assert_eq!(intent.message_id, MessageId::from("m4"));
        assert!(h.intents.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_cancels_armed_timer_across_conversations() {
        let mut h = harness(false, true);

        h.marker.on_candidate_message(&message("m1"));
        h.focus.set_focused(true);
        tokio::time::advance(Duration::from_millis(500)).await;
        h.focus.set_focused(false);

        h.marker
            .on_candidate_message(&CandidateMessage::new("x1", "c2", "u3"));
        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(h.intents.try_recv().is_err());

        h.focus.set_focused(true);
        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;

        let intent = h.intents.try_recv().unwrap();
        assert_eq!(intent.message_id, MessageId::from("x1"));
        assert_eq!(intent.target.channel_id().as_str(), "c2");
        assert!(h.intents.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_focused_message_supersedes_unfocused_listener() {
        let mut h = harness(false, true);

        h.marker.on_candidate_message(&message("m1"));
        h.focus.set_focused(true);
        h.marker.on_candidate_message(&message("m2"));

        let intent = h.intents.try_recv().unwrap();
        assert_eq!(intent.message_id, MessageId::from("m2"));

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert!(h.intents.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_work() {
        let mut h = harness(false, true);

        h.marker.on_candidate_message(&message("m1"));
        h.marker.cancel();
        h.focus.set_focused(true);
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;

        assert!(h.intents.try_recv().is_err());
        assert!(!h.marker.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_delay() {
        let mut port = MockFollowingPort::new();
        port.expect_is_following().return_const(true);
        let focus = Arc::new(FocusMonitor::new(false));
        let (tx, mut intents) = mpsc::unbounded_channel();
        let marker = DeferredReadMarker::with_delay(
            focus.clone(),
            Arc::new(port),
            tx,
            Duration::from_millis(250),
        );

        marker.on_candidate_message(&message("m1"));
        focus.set_focused(true);
        tokio::time::advance(Duration::from_millis(250)).await;
        settle().await;

        assert!(intents.try_recv().is_ok());
        assert_eq!(marker.delay(), Duration::from_millis(250));
    }
}
