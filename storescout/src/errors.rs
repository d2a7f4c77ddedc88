//! Error types for storescout.
//!
//! The taxonomy separates input validation, transport and service failures,
//! and local IO so callers can decide which failures abort a search run and
//! which stay isolated to a single verification row.

use thiserror::Error;

/// Message shown when a search fails and the service gave no reason.
pub const SEARCH_RETRY_MESSAGE: &str = "An error occurred during search. Please try again.";

/// Message shown when required search fields are missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// Convenience alias for results produced by this crate.
pub type Result<T, E = ScoutError> = std::result::Result<T, E>;

/// The main error type for storescout operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Required input was missing or blank.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("Service error ({status}): {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service, or the status reason.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An operation was invoked in a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScoutError {
    /// Creates a service error.
    #[must_use]
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Whether this error came from talking to an external service.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Service { .. } | Self::Decode(_)
        )
    }

    /// Returns the message suitable for showing to an end user.
    ///
    /// Service errors carry the service's own explanation when it gave one.
    /// Every other remote failure collapses to a generic retry suggestion.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => MISSING_FIELDS_MESSAGE.to_string(),
            Self::Service { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Network(_) | Self::Service { .. } | Self::Decode(_) => {
                SEARCH_RETRY_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::service(status.as_u16(), err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Error raised when search input is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required fields: {}", fields.join(", "))]
pub struct ValidationError {
    /// Names of the fields that were missing or blank.
    pub fields: Vec<String>,
}

impl ValidationError {
    /// Creates a validation error for the given field names.
    #[must_use]
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = ValidationError::missing(["city", "category"]);
        assert_eq!(err.to_string(), "Missing required fields: city, category");
    }

    #[test]
    fn test_user_message_prefers_service_text() {
        let err = ScoutError::service(400, "Missing required fields");
        assert_eq!(err.user_message(), "Missing required fields");
    }

    #[test]
    fn test_user_message_generic_for_network() {
        let err = ScoutError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), SEARCH_RETRY_MESSAGE);

        let blank = ScoutError::service(502, "  ");
        assert_eq!(blank.user_message(), SEARCH_RETRY_MESSAGE);
    }

    #[test]
    fn test_user_message_for_validation() {
        let err: ScoutError = ValidationError::missing(["country"]).into();
        assert_eq!(err.user_message(), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_is_remote() {
        assert!(ScoutError::Decode("bad".into()).is_remote());
        assert!(ScoutError::service(500, "boom").is_remote());
        assert!(!ScoutError::InvalidState("idle".into()).is_remote());
        assert!(!ScoutError::Config("no token".into()).is_remote());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let scout: ScoutError = err.into();
        assert!(matches!(scout, ScoutError::Decode(_)));
    }
}
