//! Transaction file upload

use crate::cache::{CacheManager, Namespace};
use crate::error::{TallyError, TallyResult};
use crate::models::UploadResponse;
use crate::preferences::{PreferenceStore, YearMonth};
use crate::transport::{ApiClient, FilePart};
use tracing::{info, warn};

/// Namespaces invalidated by every successful upload
pub const UPLOAD_INVALIDATES: [Namespace; 6] = [
    Namespace::Dashboard,
    Namespace::Trend,
    Namespace::Recent,
    Namespace::Insights,
    Namespace::Anomalies,
    Namespace::MonthSummary,
];

const UPLOAD_PATH: &str = "/transactions/upload";

/// What a completed upload did
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub inserted: u64,
    /// Month written to the selected-month preference
    pub selected_month: Option<YearMonth>,
}

/// Uploads a transaction file and resynchronises dependent views
#[derive(Debug, Clone)]
pub struct UploadPipeline {
    api: ApiClient,
    cache: CacheManager,
    preferences: PreferenceStore,
}

impl UploadPipeline {
    pub fn new(api: ApiClient, cache: CacheManager, preferences: PreferenceStore) -> Self {
        Self {
            api,
            cache,
            preferences,
        }
    }

    /// Upload `file`.
    ///
    /// On failure nothing is written and nothing is invalidated.
    pub async fn upload(&self, file: FilePart) -> TallyResult<UploadOutcome> {
        if file.is_empty() {
            return Err(TallyError::validation_field(
                "Choose a non-empty CSV file",
                "file",
            ));
        }

        let file_name = file.file_name.clone();
        let response: UploadResponse = self
            .api
            .post_multipart(UPLOAD_PATH, file)
            .await
            .inspect_err(|e| warn!(file = %file_name, error = %e, "upload failed"))?;

        let selected_month = response
            .latest_month
            .as_deref()
            .and_then(|hint| self.apply_month_hint(hint));

        self.cache.invalidate_many(&UPLOAD_INVALIDATES);

        info!(
            file = %file_name,
            inserted = response.inserted,
            latest_month = ?response.latest_month,
            "upload complete"
        );

        Ok(UploadOutcome {
            inserted: response.inserted,
            selected_month,
        })
    }

    fn apply_month_hint(&self, hint: &str) -> Option<YearMonth> {
        let month = match hint.parse::<YearMonth>() {
            Ok(month) => month,
            Err(e) => {
                warn!(hint, error = %e, "ignoring malformed latest_month");
                return None;
            }
        };

        match self.preferences.set_selected_month(month) {
            Ok(()) => Some(month),
            Err(e) => {
                warn!(month = %month, error = %e, "failed to store selected month");
                None
            }
        }
    }
}
