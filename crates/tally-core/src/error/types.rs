//! Core error type for the Tally client

use thiserror::Error;

/// Result type alias for Tally client operations
pub type TallyResult<T> = Result<T, TallyError>;

/// Main error type for the Tally client
///
/// `Clone` is required: a failed fetch is shared between every caller that
/// coalesced onto it, and is also kept on the cache entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TallyError {
    /// Absent or rejected credential
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// No response was received (connection refused, DNS, timeout)
    #[error("Network error: {message}")]
    Network {
        message: String,
        url: Option<String>,
    },

    /// Non-success HTTP status
    #[error("Server error (status {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server {
        status: u16,
        detail: Option<String>,
        url: Option<String>,
    },

    /// Local validation failure, raised before any request is issued
    #[error("Invalid input: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Persisted state (token, preferences) could not be read or written
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        path: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Request was abandoned before it settled
    #[error("Request was cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}

impl TallyError {
    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server supplied human-readable detail, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message to show the user: the server's detail when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Validation { message, .. } => message.clone(),
            Self::Auth { message } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether an automatic retry can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Server { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Json { .. } | Self::Io { .. } | Self::Other { .. } => true,
            Self::Auth { .. }
            | Self::Validation { .. }
            | Self::Config { .. }
            | Self::Storage { .. }
            | Self::Cancelled => false,
        }
    }

    /// Whether the server rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Auth { .. }) || self.status_code() == Some(401)
    }
}

impl From<std::io::Error> for TallyError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: error.to_string(),
            context: None,
        }
    }
}

impl From<reqwest::Error> for TallyError {
    fn from(error: reqwest::Error) -> Self {
        let url = error.url().map(|u| u.to_string());
        if let Some(status) = error.status() {
            return Self::Server {
                status: status.as_u16(),
                detail: None,
                url,
            };
        }
        if error.is_decode() {
            return Self::Json {
                message: error.to_string(),
                context: url,
            };
        }
        Self::Network {
            message: error.to_string(),
            url,
        }
    }
}

impl From<toml::de::Error> for TallyError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config {
            message: error.to_string(),
            context: Some("Parsing TOML configuration".to_string()),
        }
    }
}
