//! Tracks which conversation is on screen.

use parking_lot::RwLock;

use crate::domain::entities::ReadTarget;
use crate::domain::ports::FollowingPort;

/// The conversation currently open in the UI, if any.
#[derive(Debug, Default)]
pub struct Viewport {
    open: RwLock<Option<ReadTarget>>,
}

impl Viewport {
    /// Creates a viewport showing `open`, or nothing.
    #[must_use]
    pub fn new(open: Option<ReadTarget>) -> Self {
        Self {
            open: RwLock::new(open),
        }
    }

    /// Opens `target`, replacing whatever was shown.
    pub fn open(&self, target: ReadTarget) {
        *self.open.write() = Some(target);
    }

    /// Closes the open conversation.
    pub fn close(&self) {
        *self.open.write() = None;
    }
}

impl FollowingPort for Viewport {
    fn is_following(&self, target: &ReadTarget) -> bool {
        self.open.read().as_ref() == Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_only_open_target() {
        let channel = ReadTarget::Channel {
            channel_id: "c1".into(),
        };
        let thread = ReadTarget::Thread {
            channel_id: "c1".into(),
            parent_id: "m1".into(),
        };
        let viewport = Viewport::new(Some(channel.clone()));

        assert!(viewport.is_following(&channel));
        assert!(!viewport.is_following(&thread));

        viewport.open(thread.clone());
        assert!(viewport.is_following(&thread));
        assert!(!viewport.is_following(&channel));

        viewport.close();
        assert!(!viewport.is_following(&thread));
    }
}
