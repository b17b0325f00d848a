//! Cached reads of server resources

use super::TallyClient;
use crate::cache::{CacheKey, Namespace, Query};
use crate::error::TallyResult;
use crate::models::{
    AdvancedInsights, AnomalyPoint, CategorizeResponse, DashboardSummary, InsightsReport,
    MonthSummary, TransactionRecord, TrendPoint, UserProfile, UserPublic,
};
use crate::preferences::YearMonth;
use crate::transport::ApiClient;
use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;

type QueryParams = Vec<(&'static str, String)>;

/// Fetcher issuing `GET path?query` on every call
fn get<T>(
    api: &ApiClient,
    path: impl Into<String>,
    query: QueryParams,
) -> impl Fn() -> BoxFuture<'static, TallyResult<T>> + Send + Sync + 'static
where
    T: DeserializeOwned + Send + 'static,
{
    let api = api.clone();
    let path = path.into();
    move || {
        let api = api.clone();
        let path = path.clone();
        let query = query.clone();
        async move { api.get_json(&path, &query).await }.boxed()
    }
}

fn dashboard_key(month: YearMonth) -> CacheKey {
    CacheKey::new(Namespace::Dashboard).with_param("month", month)
}

fn summary_key(month: YearMonth) -> CacheKey {
    CacheKey::new(Namespace::Insights)
        .with_param("kind", "summary")
        .with_param("month", month)
}

impl TallyClient {
    /// Dashboard totals; a failed fetch yields a zero record
    pub async fn dashboard(&self, month: YearMonth) -> Query<DashboardSummary> {
        let fetch = get(
            &self.api,
            "/analytics/dashboard",
            vec![("month", month.to_string())],
        );
        self.cache.read(dashboard_key(month), fetch).await
    }

    /// Dashboard totals, bypassing the staleness window
    pub async fn refresh_dashboard(&self, month: YearMonth) -> Query<DashboardSummary> {
        let fetch = get(
            &self.api,
            "/analytics/dashboard",
            vec![("month", month.to_string())],
        );
        self.cache.refetch(dashboard_key(month), fetch).await
    }

    /// Monthly spend series, oldest first
    pub async fn trend(&self) -> Query<Vec<TrendPoint>> {
        let fetch = get(&self.api, "/analytics/trend", Vec::new());
        self.cache.read(CacheKey::new(Namespace::Trend), fetch).await
    }

    pub async fn recent(&self, limit: u32) -> Query<Vec<TransactionRecord>> {
        let key = CacheKey::new(Namespace::Recent).with_param("limit", limit);
        let fetch = get(
            &self.api,
            "/transactions/recent",
            vec![("limit", limit.to_string())],
        );
        self.cache.read(key, fetch).await
    }

    /// Recent transactions shown on the dashboard
    pub async fn dashboard_recent(&self) -> Query<Vec<TransactionRecord>> {
        self.recent(self.config.recent_limit).await
    }

    /// Transaction history; `limit` defaults to the configured history size
    pub async fn history(&self, limit: Option<u32>) -> Query<Vec<TransactionRecord>> {
        self.recent(limit.unwrap_or(self.config.history_limit)).await
    }

    /// Cached insight summary. Never goes stale on its own.
    pub async fn insights_summary(&self, month: YearMonth) -> Query<InsightsReport> {
        let fetch = get(
            &self.api,
            "/insights/summary",
            vec![("month", month.to_string())],
        );
        self.cache.read(summary_key(month), fetch).await
    }

    /// Generate a fresh insight summary
    pub async fn generate_insights(&self, month: YearMonth) -> Query<InsightsReport> {
        let fetch = get(
            &self.api,
            "/insights/summary",
            vec![("month", month.to_string())],
        );
        self.cache.refetch(summary_key(month), fetch).await
    }

    /// Advanced report, passing the monthly budget preference when set
    pub async fn advanced_insights(
        &self,
        month: YearMonth,
        refresh: bool,
    ) -> Query<AdvancedInsights> {
        let budget = self.preferences.monthly_budget();
        let mut key = CacheKey::new(Namespace::Insights)
            .with_param("kind", "advanced")
            .with_param("month", month);
        let mut params = vec![
            ("month", month.month().to_string()),
            ("year", month.year().to_string()),
        ];
        if let Some(budget) = budget {
            key = key.with_param("budget_inr", budget);
            params.push(("budget_inr", budget.to_string()));
        }

        let fetch = get(&self.api, "/insights/advanced", params);
        if refresh {
            self.cache.refetch(key, fetch).await
        } else {
            self.cache.read(key, fetch).await
        }
    }

    /// Unusually large transactions in `month`
    pub async fn anomalies(&self, month: YearMonth) -> Query<Vec<AnomalyPoint>> {
        let key = CacheKey::new(Namespace::Anomalies).with_param("month", month);
        let fetch = get(
            &self.api,
            "/analytics/anomalies",
            vec![("month", month.to_string())],
        );
        self.cache.read(key, fetch).await
    }

    pub async fn month_summary(&self, month: YearMonth) -> Query<MonthSummary> {
        let key = CacheKey::new(Namespace::MonthSummary).with_param("month", month);
        let fetch = get(
            &self.api,
            format!("/transactions/month-summary/{}", month),
            Vec::new(),
        );
        self.cache.read(key, fetch).await
    }

    pub async fn profile(&self) -> Query<UserProfile> {
        let key = CacheKey::new(Namespace::Profile).with_param("view", "profile");
        let fetch = get(&self.api, "/users/profile", Vec::new());
        self.cache.read(key, fetch).await
    }

    /// The signed-in user
    pub async fn me(&self) -> Query<UserPublic> {
        let key = CacheKey::new(Namespace::Profile).with_param("view", "me");
        let fetch = get(&self.api, "/auth/me", Vec::new());
        self.cache.read(key, fetch).await
    }

    /// Ask the server to categorize a transaction description. Not cached.
    pub async fn categorize(&self, description: &str) -> TallyResult<CategorizeResponse> {
        self.api
            .post_query(
                "/transactions/categorize",
                &[("description", description.to_string())],
            )
            .await
    }
}
