//! Error types for the `EduAGI` dashboard client

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the dashboard client
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP response
    #[error("Network error: {message}")]
    Network {
        /// Error message
        message: String,
    },

    /// The backend answered with a non-success status
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response detail or reason phrase
        message: String,
    },

    /// The backend rejected the session token
    #[error("Session expired or not authorized")]
    Unauthorized,

    /// The response body did not match the expected payload
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Error message
        message: String,
    },

    /// Input rejected before any request was made
    #[error("Validation error: {field} - {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a new network error
    #[must_use]
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new API status error
    #[must_use]
    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new decode error
    #[must_use]
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new validation error
    #[must_use]
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error ended the current session
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether the error was raised before reaching the network
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
