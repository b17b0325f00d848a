//! Constructor methods for TallyError

use super::types::TallyError;

impl TallyError {
    /// Create a new authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            url: None,
        }
    }

    /// Create a network error tagged with the request URL
    pub fn network_with_url(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            url: Some(url.into()),
        }
    }

    /// Create a new server error
    pub fn server(status: u16, detail: Option<String>) -> Self {
        Self::Server {
            status,
            detail,
            url: None,
        }
    }

    /// Create a server error tagged with the request URL
    pub fn server_with_url(status: u16, detail: Option<String>, url: impl Into<String>) -> Self {
        Self::Server {
            status,
            detail,
            url: Some(url.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error for a named field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            path: None,
        }
    }

    /// Create a storage error for a specific path
    pub fn storage_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a JSON error with context
    pub fn json_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }
}
