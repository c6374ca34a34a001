//! Window focus observation.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::debug;

type FocusCallback = Box<dyn FnOnce() + Send + 'static>;

/// Tracks whether the application window holds input focus.
///
/// The host feeds focus transitions through [`FocusMonitor::set_focused`].
/// A single "next focus" subscriber is supported; registering a new one
/// replaces the previous registration.
pub struct FocusMonitor {
    focused: AtomicBool,
    next_focus: Mutex<Option<FocusCallback>>,
}

impl FocusMonitor {
    /// Creates a monitor with the given initial focus state.
    #[must_use]
    pub fn new(focused: bool) -> Self {
        Self {
            focused: AtomicBool::new(focused),
            next_focus: Mutex::new(None),
        }
    }

    /// Returns true if the window currently holds input focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    /// Runs `callback` once, on the next unfocused to focused transition.
    ///
    /// Returns true if a previous registration was replaced.
    pub fn once_focused(&self, callback: impl FnOnce() + Send + 'static) -> bool {
        let replaced = self.next_focus.lock().replace(Box::new(callback)).is_some();
        if replaced {
            debug!("Replaced pending focus listener");
        }
        replaced
    }

    /// Drops the pending registration, if any. Returns true if one was dropped.
    pub fn clear_pending(&self) -> bool {
        self.next_focus.lock().take().is_some()
    }

    /// Returns whether a focus listener is registered.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.next_focus.lock().is_some()
    }

    /// Records a focus change reported by the host window.
    ///
    /// The pending callback runs on the calling thread after the registration
    /// slot is released, so it may register a new listener.
    pub fn set_focused(&self, focused: bool) {
        let was_focused = self.focused.swap(focused, Ordering::SeqCst);
        if !focused || was_focused {
            return;
        }

        debug!("Window regained focus");
        let callback = self.next_focus.lock().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl Default for FocusMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for FocusMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusMonitor")
            .field("focused", &self.has_focus())
            .field("pending", &self.has_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_callback_fires_once_on_focus_gain() {
        let monitor = FocusMonitor::new(false);
        let (count, callback) = counter();

        monitor.once_focused(callback);
        monitor.set_focused(true);
        monitor.set_focused(false);
        monitor.set_focused(true);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!monitor.has_pending());
    }

    #[test]
    fn test_new_registration_replaces_previous() {
        let monitor = FocusMonitor::new(false);
        let (first, first_cb) = counter();
        let (second, second_cb) = counter();

        assert!(!monitor.once_focused(first_cb));
        assert!(monitor.once_focused(second_cb));
        monitor.set_focused(true);

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_already_focused_does_not_fire() {
        let monitor = FocusMonitor::new(true);
        let (count, callback) = counter();

        monitor.once_focused(callback);
        monitor.set_focused(true);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(monitor.has_pending());
    }

    #[test]
    fn test_clear_pending() {
        let monitor = FocusMonitor::new(false);
        let (count, callback) = counter();

        monitor.once_focused(callback);
        assert!(monitor.clear_pending());
        assert!(!monitor.clear_pending());
        monitor.set_focused(true);

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_may_reregister() {
        let monitor = Arc::new(FocusMonitor::new(false));
        let (count, callback) = counter();
        let inner = monitor.clone();

        monitor.once_focused(move || {
            inner.once_focused(callback);
        });
        monitor.set_focused(true);
        assert!(monitor.has_pending());

        monitor.set_focused(false);
        monitor.set_focused(true);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
