//! Domain error types.

mod gateway_error;
mod unread_error;

pub use gateway_error::GatewayError;
pub use unread_error::UnreadError;
