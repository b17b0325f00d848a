//! Client facade
//!
//! [`TallyClient`] owns one session, one transport, one cache, and one
//! preference store, and hands the same handles to every operation.

mod builder;
mod queries;

pub use builder::TallyClientBuilder;

use crate::auth::{Admission, Session, SessionGuard, View};
use crate::cache::CacheManager;
use crate::config::ClientConfig;
use crate::error::TallyResult;
use crate::export::{BlobStore, ExportFormat, save_download};
use crate::models::{
    AvatarUploadResponse, LoginRequest, ProfileUpdate, SignupRequest, UserProfile,
};
use crate::pipeline::{self, UploadOutcome, UploadPipeline};
use crate::preferences::{PreferenceStore, YearMonth};
use crate::transport::{ApiClient, FilePart};
use std::path::{Path, PathBuf};
use tracing::info;

/// Entry point to the finance service
#[derive(Debug, Clone)]
pub struct TallyClient {
    config: ClientConfig,
    session: Session,
    api: ApiClient,
    cache: CacheManager,
    preferences: PreferenceStore,
    blobs: BlobStore,
}

impl TallyClient {
    /// Client with file-backed session and preferences under the data dir
    pub fn new(config: ClientConfig) -> TallyResult<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> TallyClientBuilder {
        TallyClientBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Decide whether `view` may render
    pub fn admit(&self, view: View) -> Admission {
        SessionGuard::new(self.session.clone()).admit(view)
    }

    pub async fn login(&self, email: &str, password: &str) -> TallyResult<()> {
        pipeline::login(&self.api, &self.cache, &LoginRequest::new(email, password)).await
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> TallyResult<()> {
        pipeline::signup(
            &self.api,
            &self.cache,
            &SignupRequest::new(name, email, password),
        )
        .await
    }

    pub fn logout(&self) -> TallyResult<()> {
        pipeline::logout(&self.session, &self.cache)
    }

    pub fn selected_month(&self) -> YearMonth {
        self.preferences.selected_month()
    }

    /// Change the selected month and invalidate month-scoped data
    pub fn select_month(&self, month: YearMonth) -> TallyResult<()> {
        pipeline::select_month(&self.preferences, &self.cache, month)
    }

    pub fn monthly_budget(&self) -> Option<f64> {
        self.preferences.monthly_budget()
    }

    pub fn set_monthly_budget(&self, value: &str) -> TallyResult<()> {
        self.preferences.set_monthly_budget(value)
    }

    pub fn upload_pipeline(&self) -> UploadPipeline {
        UploadPipeline::new(
            self.api.clone(),
            self.cache.clone(),
            self.preferences.clone(),
        )
    }

    /// Upload a transaction CSV from disk
    pub async fn upload(&self, path: &Path) -> TallyResult<UploadOutcome> {
        let file = FilePart::from_path(path).await?;
        self.upload_pipeline().upload(file).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> TallyResult<UserProfile> {
        pipeline::update_profile(&self.api, &self.cache, update).await
    }

    pub async fn upload_avatar(&self, path: &Path) -> TallyResult<AvatarUploadResponse> {
        let image = FilePart::from_path(path).await?;
        pipeline::upload_avatar(&self.api, &self.cache, image).await
    }

    /// Download an export and save it into `dir`
    pub async fn export(
        &self,
        format: ExportFormat,
        month: Option<YearMonth>,
        dir: &Path,
    ) -> TallyResult<PathBuf> {
        let query: Vec<(&str, String)> = month
            .map(|m| vec![("month", m.to_string())])
            .unwrap_or_default();
        let download = self.api.get_binary(&format.path(), &query).await?;
        let file_name = format.file_name(month);
        let saved = save_download(&self.blobs, &download, &file_name, dir).await?;
        info!(path = %saved.display(), bytes = download.len(), "export saved");
        Ok(saved)
    }
}
