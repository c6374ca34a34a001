//! Conversation visibility port.

use crate::domain::entities::ReadTarget;

/// Answers whether the user currently follows (has open and visible) a target.
#[cfg_attr(test, mockall::automock)]
pub trait FollowingPort: Send + Sync {
    /// Returns true if `target` is the conversation currently on screen.
    fn is_following(&self, target: &ReadTarget) -> bool;
}
