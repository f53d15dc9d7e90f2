//! Error types for the wellness_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wellness_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request field was missing or malformed
    #[error("Invalid input: {field} {reason}")]
    Validation { field: String, reason: String },

    /// The record store reported a fault (connectivity, throttling, ...)
    #[error("Store error: {0}")]
    Store(String),

    /// A store call exceeded its deadline
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Outbound notification failed
    #[error("Notification error: {0}")]
    Notify(String),

    /// Unexpected failure inside a calculation
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status an endpoint should answer with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation { .. } => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let err = Error::validation("height", "is required");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Invalid input: height is required");
    }

    #[test]
    fn test_faults_map_to_500() {
        assert_eq!(Error::Store("throttled".into()).status_code(), 500);
        assert_eq!(Error::Internal("nan".into()).status_code(), 500);
        let timeout = Error::Timeout {
            operation: "lookup veg-at".into(),
            timeout_ms: 50,
        };
        assert_eq!(timeout.status_code(), 500);
        assert_eq!(timeout.to_string(), "lookup veg-at timed out after 50ms");
    }
}
