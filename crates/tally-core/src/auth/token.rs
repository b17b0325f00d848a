//! Bearer credential and its persisted storage

use crate::error::{TallyError, TallyResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Opaque bearer credential.
///
/// Never empty: an absent session is `Option::None`, not an empty string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token, rejecting empty or blank values
    pub fn new(raw: impl Into<String>) -> TallyResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TallyError::validation_field(
                "Access token must not be empty",
                "access_token",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl TryFrom<String> for AuthToken {
    type Error = TallyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AuthToken> for String {
    fn from(token: AuthToken) -> Self {
        token.0
    }
}

/// Token as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    /// Bearer credential
    pub access_token: AuthToken,
    /// Token type reported by the server (usually "bearer")
    pub token_type: String,
    /// When the token was stored
    pub issued_at: DateTime<Utc>,
}

impl StoredToken {
    /// Wrap a token issued now
    pub fn new(access_token: AuthToken, token_type: impl Into<String>) -> Self {
        Self {
            access_token,
            token_type: token_type.into(),
            issued_at: Utc::now(),
        }
    }
}

/// Token storage interface
pub trait TokenStorage: Send + Sync {
    /// Store token
    fn store(&self, token: &StoredToken) -> TallyResult<()>;

    /// Retrieve token
    fn retrieve(&self) -> TallyResult<Option<StoredToken>>;

    /// Delete token
    fn delete(&self) -> TallyResult<()>;
}

/// File-based token storage (`<data_dir>/session.json`)
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage file name inside the data directory
    pub const FILE_NAME: &'static str = "session.json";

    /// Create storage for a file inside `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: data_dir.into().join(Self::FILE_NAME),
        }
    }

    /// Path of the token file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn storage_error(&self, message: impl fmt::Display) -> TallyError {
        TallyError::storage_with_path(message.to_string(), self.path.display().to_string())
    }
}

impl TokenStorage for FileTokenStorage {
    fn store(&self, token: &StoredToken) -> TallyResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }

        let content = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, content).map_err(|e| self.storage_error(e))?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms).map_err(|e| self.storage_error(e))?;
        }

        Ok(())
    }

    fn retrieve(&self) -> TallyResult<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        match serde_json::from_str::<StoredToken>(&content) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                // A corrupt or emptied file means no usable session
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn delete(&self) -> TallyResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| self.storage_error(e))?;
        }
        Ok(())
    }
}

/// In-memory token storage, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<StoredToken>>,
}

impl MemoryTokenStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn store(&self, token: &StoredToken) -> TallyResult<()> {
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    fn retrieve(&self) -> TallyResult<Option<StoredToken>> {
        Ok(self.token.lock().clone())
    }

    fn delete(&self) -> TallyResult<()> {
        *self.token.lock() = None;
        Ok(())
    }
}
