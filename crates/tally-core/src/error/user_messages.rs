//! Error classification for user-facing output

use super::types::TallyError;

/// Error category for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or rejected credential
    Authentication,
    /// No response from the service
    Network,
    /// The service answered with a failure
    Server,
    /// Invalid user input
    UserInput,
    /// Local configuration problems
    Configuration,
    /// Persisted state or file system problems
    FileSystem,
    /// Anything else
    Internal,
}

impl ErrorCategory {
    /// Get a user-friendly category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication Error",
            Self::Network => "Network Error",
            Self::Server => "Server Error",
            Self::UserInput => "Invalid Input",
            Self::Configuration => "Configuration Error",
            Self::FileSystem => "File System Error",
            Self::Internal => "Internal Error",
        }
    }

    /// One-line hint suggesting what the user can do next
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Authentication => Some("Run `tally login` to start a new session"),
            Self::Network => Some("Check that the Tally service is reachable (TALLY_API_URL)"),
            Self::Configuration => Some("Review ~/.config/tally/config.toml"),
            Self::FileSystem => Some("Check permissions on the Tally data directory"),
            Self::Server | Self::UserInput | Self::Internal => None,
        }
    }
}

impl TallyError {
    /// Classify the error for display
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Auth { .. } => ErrorCategory::Authentication,
            Self::Server { status: 401, .. } => ErrorCategory::Authentication,
            Self::Server { .. } => ErrorCategory::Server,
            Self::Network { .. } => ErrorCategory::Network,
            Self::Validation { .. } => ErrorCategory::UserInput,
            Self::Config { .. } => ErrorCategory::Configuration,
            Self::Storage { .. } | Self::Io { .. } => ErrorCategory::FileSystem,
            Self::Json { .. } | Self::Cancelled | Self::Other { .. } => ErrorCategory::Internal,
        }
    }
}
