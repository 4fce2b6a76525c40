//! Syntek error types.

use thiserror::Error;

/// Errors returned by the Syntek client.
#[derive(Debug, Error)]
pub enum SyntekError {
    /// Configuration is invalid or no credential could be resolved.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The gateway answered with a non-success status.
    ///
    /// The message is the `error` field of the response body when present,
    /// otherwise the raw body text.
    #[error("{message}")]
    Remote {
        /// HTTP status code returned by the gateway.
        status: u16,
        /// Server-supplied error message.
        message: String,
    },

    /// The request could not be sent or its response could not be read.
    #[error("Gateway transport error: {0}")]
    Transport(String),

    /// A payload could not be encoded, or a success body was not JSON.
    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

impl SyntekError {
    /// The server-supplied message if this is a remote error.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            SyntekError::Remote { message, .. } => Some(message),
            _ => None,
        }
    }
}
