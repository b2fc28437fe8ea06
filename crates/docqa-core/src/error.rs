//! Error types for the docqa application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire docqa client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DocqaError {
    /// A required field was empty or malformed, caught before any request
    #[error("Validation error: {0}")]
    Validation(String),

    /// An operation was attempted in the wrong session state
    #[error("Invalid session state: {0}")]
    AuthState(String),

    /// The server answered with a non-2xx status and a detail message
    #[error("Server rejected the request ({status}): {detail}")]
    ServerRejection { status: u16, detail: String },

    /// Transport-level failure (connection refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// An authorized operation was attempted without a session token
    #[error("No session token available")]
    MissingToken,

    /// A request is already in flight and a second one was rejected
    #[error("A request is already in flight")]
    Busy,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocqaError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an AuthState error
    pub fn auth_state(message: impl Into<String>) -> Self {
        Self::AuthState(message.into())
    }

    /// Creates a ServerRejection error
    pub fn server_rejection(status: u16, detail: impl Into<String>) -> Self {
        Self::ServerRejection {
            status,
            detail: detail.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a ServerRejection error
    pub fn is_server_rejection(&self) -> bool {
        matches!(self, Self::ServerRejection { .. })
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a MissingToken error
    pub fn is_missing_token(&self) -> bool {
        matches!(self, Self::MissingToken)
    }

    /// Returns the message that should be shown to the user.
    ///
    /// Server-reported details are surfaced verbatim; transport failures
    /// collapse to a generic connectivity message so raw reqwest internals
    /// never reach the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::ServerRejection { detail, .. } => detail.clone(),
            Self::Validation(msg) | Self::AuthState(msg) => msg.clone(),
            Self::Network(_) => "Error contacting server.".to_string(),
            Self::MissingToken => "You must be logged in to do that.".to_string(),
            Self::Busy => "Please wait for the current request to finish.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for DocqaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocqaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DocqaError>`.
pub type Result<T> = std::result::Result<T, DocqaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_rejection_surfaces_detail_verbatim() {
        let err = DocqaError::server_rejection(401, "Invalid email or password");
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn network_error_is_generic_for_users() {
        let err = DocqaError::network("connection refused (os error 111)");
        assert_eq!(err.user_message(), "Error contacting server.");
    }

    #[test]
    fn predicates_match_variants() {
        assert!(DocqaError::validation("empty").is_validation());
        assert!(DocqaError::MissingToken.is_missing_token());
        assert!(!DocqaError::Busy.is_network());
    }
}
