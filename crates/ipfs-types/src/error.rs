//! Error types for parsing peer identifiers and addresses.

use thiserror::Error;

/// Result type alias for type parsing.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Errors raised while parsing the opaque tokens passed to daemon commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The text is not a valid base58 multihash.
    #[error("invalid peer id: {message}")]
    InvalidPeerId {
        /// Description of the format error.
        message: String,
    },

    /// The text is not a valid multiaddress.
    #[error("invalid multiaddress '{address}': {message}")]
    InvalidAddress {
        /// The rejected address text.
        address: String,
        /// Description of the format error.
        message: String,
    },
}

impl TypeError {
    /// Creates an `InvalidPeerId` error with a message.
    #[must_use]
    pub fn invalid_peer_id(message: impl Into<String>) -> Self {
        Self::InvalidPeerId {
            message: message.into(),
        }
    }

    /// Creates an `InvalidAddress` error for the given address text.
    #[must_use]
    pub fn invalid_address(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            message: message.into(),
        }
    }
}
