//! Process-wide session handle

use super::token::{AuthToken, MemoryTokenStorage, StoredToken, TokenStorage};
use crate::error::TallyResult;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to the one session of the process.
///
/// Cloning is cheap and every clone observes the same token. The transport
/// reads the token when it dispatches a request, so `set`/`clear` affect every
/// request issued afterwards while requests already sent keep the header they
/// were built with.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    token: RwLock<Option<AuthToken>>,
    storage: Box<dyn TokenStorage>,
}

impl Session {
    /// Create a session backed by `storage`, restoring any persisted token
    pub fn new(storage: Box<dyn TokenStorage>) -> TallyResult<Self> {
        let restored = storage.retrieve()?.map(|stored| stored.access_token);
        debug!(restored = restored.is_some(), "session initialized");
        Ok(Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(restored),
                storage,
            }),
        })
    }

    /// Session that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(None),
                storage: Box::new(MemoryTokenStorage::new()),
            }),
        }
    }

    /// Store a new credential, persisting it before it becomes visible
    pub fn set(&self, token: AuthToken) -> TallyResult<()> {
        self.set_with_type(token, "bearer")
    }

    /// Store a new credential with the token type reported by the server
    pub fn set_with_type(&self, token: AuthToken, token_type: &str) -> TallyResult<()> {
        self.inner
            .storage
            .store(&StoredToken::new(token.clone(), token_type))?;
        *self.inner.token.write() = Some(token);
        info!("session started");
        Ok(())
    }

    /// Current credential, if any
    pub fn get(&self) -> Option<AuthToken> {
        self.inner.token.read().clone()
    }

    /// Whether a credential is present
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Drop the credential from storage and memory.
    ///
    /// The in-memory token is gone even when the storage delete fails; the
    /// storage error is returned afterwards.
    pub fn clear(&self) -> TallyResult<()> {
        let deleted = self.inner.storage.delete();
        *self.inner.token.write() = None;
        deleted?;
        info!("session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FileTokenStorage;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_clear() {
        let session = Session::in_memory();
        assert!(session.get().is_none());

        session.set(AuthToken::new("abc").unwrap()).unwrap();
        assert_eq!(session.get().unwrap().as_str(), "abc");

        session.clear().unwrap();
        assert!(session.get().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::in_memory();
        let view_a = session.clone();
        let view_b = session.clone();

        view_a.set(AuthToken::new("shared").unwrap()).unwrap();
        assert_eq!(view_b.get().unwrap().as_str(), "shared");

        view_b.clear().unwrap();
        assert!(view_a.get().is_none());
    }

    #[test]
    fn test_survives_reload() {
        let temp_dir = TempDir::new().unwrap();
        {
            let session = Session::new(Box::new(FileTokenStorage::new(temp_dir.path()))).unwrap();
            session.set(AuthToken::new("persisted").unwrap()).unwrap();
        }

        let reloaded = Session::new(Box::new(FileTokenStorage::new(temp_dir.path()))).unwrap();
        assert_eq!(reloaded.get().unwrap().as_str(), "persisted");

        reloaded.clear().unwrap();
        let again = Session::new(Box::new(FileTokenStorage::new(temp_dir.path()))).unwrap();
        assert!(again.get().is_none());
    }

    #[test]
    fn test_clear_drops_token_when_delete_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::new(temp_dir.path());
        let path = storage.path().to_path_buf();
        let session = Session::new(Box::new(storage)).unwrap();
        session.set(AuthToken::new("stuck").unwrap()).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(session.clear().is_err());
        assert!(!session.is_authenticated());
    }
}
