//! Unified application error types for BloodBridge.
//!
//! Every failure the directory client can produce is an [`AppError`]. The
//! [`ErrorKind`] tells the caller which user-facing treatment applies:
//! network failures suggest a retry, validation failures are shown
//! verbatim and never touch the network, and server rejections carry the
//! backend's own message whenever it supplied one.

use std::fmt;
use thiserror::Error;

/// Fallback notice shown for any failure that never reached the server.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Generic fallback for a rejected request without a server message.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// Top-level error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No response reached the client (connectivity loss, DNS, timeout).
    Network,
    /// Client-side input failure. Never reaches the network.
    Validation,
    /// The server answered with a non-2xx status.
    ServerRejection,
    /// A live session is required, or the supplied credentials were refused.
    Authentication,
    /// The requested resource was not found locally.
    NotFound,
    /// A response or stored record could not be (de)serialized.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// Local session persistence failed.
    Storage,
    /// An internal invariant was broken.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::ServerRejection => write!(f, "SERVER_REJECTION"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout BloodBridge.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// HTTP status code, for server rejections.
    pub status: Option<u16>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a server rejection carrying the response status.
    pub fn server_rejection(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ServerRejection,
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is a client-side validation failure.
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// Whether the request never received a response.
    pub fn is_network(&self) -> bool {
        self.kind == ErrorKind::Network
    }

    /// The notice to show the user for this error.
    ///
    /// Network failures collapse to a retry suggestion; every other kind
    /// carries its message verbatim.
    pub fn user_message(&self) -> &str {
        match self.kind {
            ErrorKind::Network => NETWORK_ERROR_MESSAGE,
            _ => &self.message,
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            status: self.status,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::invalid(err, &[])
    }
}

impl AppError {
    /// Validation error for a rejected form.
    ///
    /// Field order is lost inside `ValidationErrors`, so the reported
    /// message is the first entry of `priority` that any field raised,
    /// falling back to the alphabetically first message.
    pub fn invalid(errors: validator::ValidationErrors, priority: &[&str]) -> Self {
        let raised: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|list| list.iter())
            .map(|e| {
                e.message
                    .as_deref()
                    .map_or_else(|| e.code.to_string(), str::to_string)
            })
            .collect();

        let message = priority
            .iter()
            .find(|p| raised.iter().any(|m| m.as_str() == **p))
            .map(|p| p.to_string())
            .or_else(|| raised.iter().min().cloned())
            .unwrap_or_else(|| "Invalid input".to_string());

        Self::with_source(ErrorKind::Validation, message, errors)
    }
}
