//! Backend gateway error types.

use thiserror::Error;

/// Failure of a backend gateway round trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum GatewayError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("server rejected request ({status}): {message}")]
    Server { status: u16, message: String },
}

impl GatewayError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }
}
