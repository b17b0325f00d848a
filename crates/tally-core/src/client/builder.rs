use super::TallyClient;
use crate::auth::{FileTokenStorage, Session};
use crate::cache::{CacheManager, CachePolicies};
use crate::config::ClientConfig;
use crate::error::TallyResult;
use crate::export::BlobStore;
use crate::preferences::{FilePreferenceBackend, PreferenceStore};
use crate::transport::ApiClient;
use std::sync::Arc;

/// Builder for [`TallyClient`]
///
/// Anything not supplied is created from the config: the session and the
/// preferences are file-backed under the data directory.
#[derive(Debug)]
pub struct TallyClientBuilder {
    config: ClientConfig,
    session: Option<Session>,
    preferences: Option<PreferenceStore>,
    policies: Option<CachePolicies>,
}

impl TallyClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: None,
            preferences: None,
            policies: None,
        }
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn preferences(mut self, preferences: PreferenceStore) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn policies(mut self, policies: CachePolicies) -> Self {
        self.policies = Some(policies);
        self
    }

    /// Session and preferences that live only in memory
    pub fn ephemeral(self) -> Self {
        self.session(Session::in_memory())
            .preferences(PreferenceStore::in_memory())
    }

    pub fn build(self) -> TallyResult<TallyClient> {
        self.config.validate()?;

        let session = match self.session {
            Some(session) => session,
            None => {
                let dir = self.config.resolved_data_dir()?;
                Session::new(Box::new(FileTokenStorage::new(dir)))?
            }
        };
        let preferences = match self.preferences {
            Some(preferences) => preferences,
            None => {
                let dir = self.config.resolved_data_dir()?;
                PreferenceStore::new(Arc::new(FilePreferenceBackend::new(dir)))
            }
        };

        let api = ApiClient::new(&self.config, session.clone())?;
        let cache = CacheManager::new(self.policies.unwrap_or_default());

        Ok(TallyClient {
            config: self.config,
            session,
            api,
            cache,
            preferences,
            blobs: BlobStore::new(),
        })
    }
}
