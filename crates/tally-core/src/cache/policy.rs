//! Per-namespace freshness, retry and failure policies

use super::types::{CacheKey, Namespace};
use crate::models::DashboardSummary;
use crate::preferences::YearMonth;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Stale windows per namespace
pub mod stale_times {
    use std::time::Duration;

    pub const DASHBOARD: Duration = Duration::from_secs(30);
    pub const TREND: Duration = Duration::from_secs(60);
    pub const RECENT: Duration = Duration::from_secs(15);
    pub const ANOMALIES: Duration = Duration::from_secs(30);
    pub const MONTH_SUMMARY: Duration = Duration::from_secs(30);
    pub const PROFILE: Duration = Duration::from_secs(60);
}

/// Default pause before the automatic retry
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Produces replacement data for a failed fetch
pub type SubstituteFn = Arc<dyn Fn(&CacheKey) -> Value + Send + Sync>;

/// What a read settles to once its retry is exhausted
#[derive(Clone)]
pub enum FailurePolicy {
    /// Record the error on the entry
    Surface,
    /// Store substituted data with a success status and log a warning
    Substitute(SubstituteFn),
}

impl fmt::Debug for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface => f.write_str("Surface"),
            Self::Substitute(_) => f.write_str("Substitute(..)"),
        }
    }
}

/// Policy for one namespace
#[derive(Debug, Clone)]
pub struct ResourcePolicy {
    /// `None`: fresh until invalidated or explicitly refetched
    pub stale_time: Option<Duration>,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub failure: FailurePolicy,
}

impl ResourcePolicy {
    pub fn new(stale_time: Option<Duration>) -> Self {
        Self {
            stale_time,
            max_retries: 1,
            retry_delay: DEFAULT_RETRY_DELAY,
            failure: FailurePolicy::Surface,
        }
    }

    pub fn with_failure(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }
}

/// Policies for all namespaces
#[derive(Debug, Clone)]
pub struct CachePolicies {
    policies: HashMap<Namespace, ResourcePolicy>,
}

impl CachePolicies {
    /// Look up the policy of a namespace
    pub fn get(&self, namespace: Namespace) -> ResourcePolicy {
        self.policies
            .get(&namespace)
            .cloned()
            .unwrap_or_else(|| ResourcePolicy::new(Some(Duration::ZERO)))
    }

    /// Replace the policy of a namespace
    pub fn set(&mut self, namespace: Namespace, policy: ResourcePolicy) {
        self.policies.insert(namespace, policy);
    }

    /// Change the retry delay of every namespace
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        for policy in self.policies.values_mut() {
            policy.retry_delay = delay;
        }
        self
    }
}

impl Default for CachePolicies {
    fn default() -> Self {
        let mut policies = HashMap::new();
        policies.insert(
            Namespace::Dashboard,
            ResourcePolicy::new(Some(stale_times::DASHBOARD))
                .with_failure(FailurePolicy::Substitute(Arc::new(zeroed_dashboard))),
        );
        policies.insert(
            Namespace::Trend,
            ResourcePolicy::new(Some(stale_times::TREND)),
        );
        policies.insert(
            Namespace::Recent,
            ResourcePolicy::new(Some(stale_times::RECENT)),
        );
        policies.insert(Namespace::Insights, ResourcePolicy::new(None));
        policies.insert(
            Namespace::Anomalies,
            ResourcePolicy::new(Some(stale_times::ANOMALIES)),
        );
        policies.insert(
            Namespace::MonthSummary,
            ResourcePolicy::new(Some(stale_times::MONTH_SUMMARY)),
        );
        policies.insert(
            Namespace::Profile,
            ResourcePolicy::new(Some(stale_times::PROFILE)),
        );
        Self { policies }
    }
}

/// Zero record for the month named by the key
fn zeroed_dashboard(key: &CacheKey) -> Value {
    let month = key
        .param("month")
        .and_then(|m| m.parse::<YearMonth>().ok())
        .unwrap_or_else(YearMonth::current);
    serde_json::to_value(DashboardSummary::zeroed(&month.to_string())).unwrap_or(Value::Null)
}
