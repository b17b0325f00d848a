//! Cache types and data structures

use crate::error::TallyError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tokio::time::Instant;

/// Logical resource grouping; the unit of invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Dashboard,
    Trend,
    Recent,
    Insights,
    Anomalies,
    MonthSummary,
    Profile,
}

impl Namespace {
    /// Every namespace
    pub const ALL: [Namespace; 7] = [
        Self::Dashboard,
        Self::Trend,
        Self::Recent,
        Self::Insights,
        Self::Anomalies,
        Self::MonthSummary,
        Self::Profile,
    ];

    /// Key prefix of the namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Trend => "trend",
            Self::Recent => "recent",
            Self::Insights => "insights",
            Self::Anomalies => "anomalies",
            Self::MonthSummary => "month-summary",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource name plus serialized parameters, e.g. `dashboard:month=2026-01`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: Namespace,
    params: BTreeMap<String, String>,
}

impl CacheKey {
    /// Key without parameters
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    /// Namespace the key belongs to
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Parameter value
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace.as_str())?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { ':' } else { '&' };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}

/// Lifecycle state of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Never fetched
    Idle,
    /// First fetch in progress
    Loading,
    /// Last fetch completed (possibly with substituted data)
    Success,
    /// Last fetch failed after its retry
    Error,
}

/// Cache entry containing data and metadata
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// Payload of the most recently completed fetch
    pub data: Option<Value>,
    pub fetched_at: Option<Instant>,
    /// End of the staleness window; `None` on a success means the entry
    /// never goes stale on its own
    pub stale_until: Option<Instant>,
    pub status: EntryStatus,
    /// Automatic retries spent by the last fetch
    pub retry_count: u32,
    /// Failure of the last fetch when `status` is `Error`
    pub error: Option<TallyError>,
    /// Set by invalidation; forces the next read to fetch
    pub invalidated: bool,
    /// Data was substituted by the namespace's failure policy
    pub degraded: bool,
    /// Bumped by invalidation; responses tagged with an older value are not stored
    pub(crate) generation: u64,
}

impl CacheEntry {
    /// Entry that has never been fetched
    pub fn idle(key: CacheKey) -> Self {
        Self {
            key,
            data: None,
            fetched_at: None,
            stale_until: None,
            status: EntryStatus::Idle,
            retry_count: 0,
            error: None,
            invalidated: false,
            degraded: false,
            generation: 0,
        }
    }

    /// Whether the entry can be served without a network call
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.status == EntryStatus::Success
            && !self.invalidated
            && self.data.is_some()
            && self.stale_until.is_none_or(|until| now < until)
    }

    /// Whether the next read must fetch
    pub fn is_stale(&self, now: Instant) -> bool {
        !self.is_fresh(now)
    }

    /// Age of the data
    pub fn age(&self, now: Instant) -> Option<std::time::Duration> {
        self.fetched_at.map(|at| now.saturating_duration_since(at))
    }
}

/// Typed view of a cache entry returned to readers
#[derive(Debug, Clone)]
pub struct Query<T> {
    pub key: CacheKey,
    pub data: Option<T>,
    pub status: EntryStatus,
    pub error: Option<TallyError>,
    pub retry_count: u32,
    pub degraded: bool,
    /// Served from cache without a network call
    pub from_cache: bool,
    /// The response arrived after an invalidation and was not stored
    pub discarded: bool,
}

impl<T: DeserializeOwned> Query<T> {
    pub(crate) fn from_entry(entry: &CacheEntry, from_cache: bool, discarded: bool) -> Self {
        let mut status = entry.status;
        let mut error = entry.error.clone();
        let data = match &entry.data {
            Some(value) => match serde_json::from_value::<T>(value.clone()) {
                Ok(data) => Some(data),
                Err(e) => {
                    status = EntryStatus::Error;
                    error = Some(TallyError::json_with_context(
                        e.to_string(),
                        format!("Decoding cached {}", entry.key),
                    ));
                    None
                }
            },
            None => None,
        };

        Self {
            key: entry.key.clone(),
            data,
            status,
            error,
            retry_count: entry.retry_count,
            degraded: entry.degraded,
            from_cache,
            discarded,
        }
    }
}

impl<T> Query<T> {
    /// Whether the read settled successfully
    pub fn is_success(&self) -> bool {
        self.status == EntryStatus::Success
    }

    /// Convert into a `Result`, surfacing the entry's error
    pub fn into_result(self) -> Result<T, TallyError> {
        match (self.data, self.error) {
            (_, Some(error)) if self.status == EntryStatus::Error => Err(error),
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(TallyError::other(format!("No data for {}", self.key))),
        }
    }
}

/// Cache counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    /// Reads served from a fresh entry
    pub hits: u64,
    /// Reads that started a fetch
    pub misses: u64,
    /// Reads that joined a fetch already in flight
    pub coalesced: u64,
    /// Network attempts, retries included
    pub fetches: u64,
    /// Responses not stored because the key was invalidated meanwhile
    pub discarded: u64,
    /// Namespace invalidations
    pub invalidations: u64,
}
