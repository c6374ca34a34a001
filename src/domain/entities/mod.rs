//! Domain entity definitions.

mod conversation;
mod ids;
mod message;
mod target;
mod unread_summary;

pub use conversation::{Conversation, ConversationKind};
pub use ids::{ConversationId, MessageId, UserId};
pub use message::{CandidateMessage, MessageRef};
pub use target::ReadTarget;
pub use unread_summary::UnreadSummary;
