//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Client event definitions.
pub mod events;
/// Port definitions.
pub mod ports;

pub use entities::{
    CandidateMessage, Conversation, ConversationId, ConversationKind, MessageId, MessageRef,
    ReadTarget, UnreadSummary, UserId,
};
pub use errors::{GatewayError, UnreadError};
pub use events::{ClientEvent, EventKind, UnreadEvent};
pub use ports::{BackendPort, FollowingPort};
