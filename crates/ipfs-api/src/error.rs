//! Error types for daemon command dispatch and response decoding.
//!
//! Failures are never retried or masked here. Callers decide whether to
//! re-issue a whole operation.

use ipfs_types::TypeError;
use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while running a daemon command.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or protocol failure at the dispatcher boundary.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// A response body was malformed or violated the expected schema.
    #[error("decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// Invalid client configuration.
    #[error("config error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// An identifier or address could not be parsed.
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl ApiError {
    /// Creates a `Transport` error with a message.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a `Decode` error with a message.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a `Config` error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` if the caller abandoned the operation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if the failure happened in the transport.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if a response body could not be decoded.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        // Undecodable bytes surface from readers as `InvalidData`.
        if err.kind() == std::io::ErrorKind::InvalidData {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}
