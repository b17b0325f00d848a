//! Query cache for server resources
//!
//! Entries are keyed by a [`Namespace`] plus request parameters. A read is
//! served from a fresh entry, joins the fetch already in flight for the same
//! key, or starts one. Fetches that fail are retried once before the
//! namespace's [`FailurePolicy`] decides what the entry settles to.
//!
//! Invalidation works per namespace: matching entries are marked stale and
//! their generation is bumped. A fetch that was in flight at that moment
//! still hands its response to the readers awaiting it, but the response is
//! not stored.

pub mod policy;
pub mod slot;
pub mod types;

#[cfg(test)]
mod tests;

pub use policy::{CachePolicies, FailurePolicy, ResourcePolicy, SubstituteFn};
pub use slot::{QuerySlot, SlotRead};
pub use types::{CacheEntry, CacheKey, CacheStatistics, EntryStatus, Namespace, Query};

use crate::error::{TallyError, TallyResult};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one fetch, shared by every reader that awaited it
#[derive(Debug, Clone)]
struct Settled {
    entry: CacheEntry,
    stored: bool,
}

type SharedFetch = Shared<BoxFuture<'static, Settled>>;

struct InFlight {
    generation: u64,
    future: SharedFetch,
}

enum Lookup {
    Hit(CacheEntry),
    Pending(SharedFetch),
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    in_flight: HashMap<CacheKey, InFlight>,
    stats: CacheStatistics,
}

struct CacheInner {
    state: Mutex<CacheState>,
    policies: CachePolicies,
}

/// Shared handle to the query cache
#[derive(Clone)]
pub struct CacheManager {
    inner: Arc<CacheInner>,
}

impl CacheManager {
    /// Create a cache with the given policies
    pub fn new(policies: CachePolicies) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                state: Mutex::new(CacheState::default()),
                policies,
            }),
        }
    }

    pub fn policies(&self) -> &CachePolicies {
        &self.inner.policies
    }

    /// Read `key`, fetching only when there is no fresh entry
    pub async fn read<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Query<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TallyResult<T>> + Send + 'static,
    {
        self.load(key, fetcher, false).await
    }

    /// Fetch `key` regardless of freshness; still joins a fetch in flight
    pub async fn refetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Query<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TallyResult<T>> + Send + 'static,
    {
        self.load(key, fetcher, true).await
    }

    async fn load<T, F, Fut>(&self, key: CacheKey, fetcher: F, force: bool) -> Query<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TallyResult<T>> + Send + 'static,
    {
        let fetch = move || {
            let request = fetcher();
            async move {
                let data = request.await?;
                serde_json::to_value(data).map_err(TallyError::from)
            }
        };

        match self.join_or_start(key, fetch, force) {
            Lookup::Hit(entry) => Query::from_entry(&entry, true, false),
            Lookup::Pending(future) => {
                let settled = future.await;
                Query::from_entry(&settled.entry, false, !settled.stored)
            }
        }
    }

    fn join_or_start<F, Fut>(&self, key: CacheKey, fetch: F, force: bool) -> Lookup
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TallyResult<Value>> + Send + 'static,
    {
        let mut guard = self.inner.state.lock();
        let state = &mut *guard;

        if !force {
            let now = Instant::now();
            if let Some(entry) = state.entries.get(&key).filter(|e| e.is_fresh(now)) {
                state.stats.hits += 1;
                debug!(key = %key, "cache hit");
                return Lookup::Hit(entry.clone());
            }
        }

        if let Some(in_flight) = state.in_flight.get(&key) {
            state.stats.coalesced += 1;
            debug!(key = %key, "joining in-flight fetch");
            return Lookup::Pending(in_flight.future.clone());
        }

        state.stats.misses += 1;
        let entry = state
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::idle(key.clone()));
        if entry.data.is_none() {
            entry.status = EntryStatus::Loading;
        }
        let generation = entry.generation;
        let policy = self.inner.policies.get(key.namespace());

        debug!(key = %key, generation, "starting fetch");
        let future = run_fetch(Arc::clone(&self.inner), key.clone(), generation, policy, fetch)
            .boxed()
            .shared();
        state.in_flight.insert(
            key,
            InFlight {
                generation,
                future: future.clone(),
            },
        );
        Lookup::Pending(future)
    }

    /// Current entry for `key` without fetching
    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.inner.state.lock().entries.get(key).cloned()
    }

    /// Typed view of the current entry for `key` without fetching
    pub fn peek<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<Query<T>> {
        self.entry(key)
            .map(|entry| Query::from_entry(&entry, true, false))
    }

    /// Whether the next read of `key` would fetch
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        self.inner
            .state
            .lock()
            .entries
            .get(key)
            .is_none_or(|entry| entry.is_stale(now))
    }

    /// Whether a fetch for `key` is in flight
    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        self.inner.state.lock().in_flight.contains_key(key)
    }

    /// Keys currently held for `namespace`
    pub fn keys(&self, namespace: Namespace) -> Vec<CacheKey> {
        self.inner
            .state
            .lock()
            .entries
            .keys()
            .filter(|key| key.namespace() == namespace)
            .cloned()
            .collect()
    }

    /// Mark every entry of `namespace` stale and detach its in-flight fetches
    ///
    /// Nothing is refetched here; the next read of each key fetches.
    /// Returns the number of entries marked.
    pub fn invalidate(&self, namespace: Namespace) -> usize {
        let mut guard = self.inner.state.lock();
        let state = &mut *guard;

        let mut marked = 0;
        for entry in state
            .entries
            .values_mut()
            .filter(|entry| entry.key.namespace() == namespace)
        {
            entry.invalidated = true;
            entry.generation += 1;
            if entry.status == EntryStatus::Loading {
                entry.status = EntryStatus::Idle;
            }
            marked += 1;
        }

        let before = state.in_flight.len();
        state
            .in_flight
            .retain(|key, _| key.namespace() != namespace);
        let detached = before - state.in_flight.len();
        state.stats.invalidations += 1;

        info!(
            namespace = %namespace,
            entries = marked,
            detached,
            "invalidated cache namespace"
        );
        marked
    }

    /// Invalidate several namespaces
    pub fn invalidate_many(&self, namespaces: &[Namespace]) -> usize {
        namespaces.iter().map(|ns| self.invalidate(*ns)).sum()
    }

    /// Invalidate every namespace
    pub fn invalidate_all(&self) -> usize {
        self.invalidate_many(&Namespace::ALL)
    }

    /// Snapshot of the cache counters
    pub fn statistics(&self) -> CacheStatistics {
        self.inner.state.lock().stats.clone()
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(CachePolicies::default())
    }
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("CacheManager")
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .field("stats", &state.stats)
            .finish()
    }
}

async fn run_fetch<F, Fut>(
    inner: Arc<CacheInner>,
    key: CacheKey,
    generation: u64,
    policy: ResourcePolicy,
    fetch: F,
) -> Settled
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TallyResult<Value>> + Send + 'static,
{
    let mut retries = 0;
    let result = loop {
        inner.state.lock().stats.fetches += 1;
        match fetch().await {
            Ok(value) => break Ok(value),
            Err(error) if retries < policy.max_retries && error.is_retryable() => {
                retries += 1;
                warn!(
                    key = %key,
                    error = %error,
                    retry = retries,
                    delay_ms = policy.retry_delay.as_millis() as u64,
                    "fetch failed, retrying"
                );
                tokio::time::sleep(policy.retry_delay).await;
            }
            Err(error) => break Err(error),
        }
    };

    inner.settle(key, generation, retries, result, &policy)
}

impl CacheInner {
    /// Apply a completed fetch; stored only if `generation` is still current
    fn settle(
        &self,
        key: CacheKey,
        generation: u64,
        retries: u32,
        result: TallyResult<Value>,
        policy: &ResourcePolicy,
    ) -> Settled {
        let now = Instant::now();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if state
            .in_flight
            .get(&key)
            .is_some_and(|f| f.generation == generation)
        {
            state.in_flight.remove(&key);
        }

        let current = state.entries.get(&key);
        let stored = current.is_some_and(|entry| entry.generation == generation);
        let mut entry = current
            .cloned()
            .unwrap_or_else(|| CacheEntry::idle(key.clone()));
        entry.retry_count = retries;

        match result {
            Ok(value) => entry.succeed(value, now, policy, false),
            Err(error) => match &policy.failure {
                FailurePolicy::Substitute(substitute) => {
                    warn!(key = %key, error = %error, "fetch failed, using fallback data");
                    entry.succeed(substitute(&key), now, policy, true);
                }
                FailurePolicy::Surface => {
                    warn!(key = %key, error = %error, "fetch failed");
                    entry.status = EntryStatus::Error;
                    entry.error = Some(error);
                }
            },
        }

        if stored {
            entry.invalidated = false;
            state.entries.insert(key, entry.clone());
        } else {
            state.stats.discarded += 1;
            debug!(key = %key, generation, "discarding response for invalidated key");
        }

        Settled { entry, stored }
    }
}

impl CacheEntry {
    fn succeed(&mut self, value: Value, now: Instant, policy: &ResourcePolicy, degraded: bool) {
        self.data = Some(value);
        self.fetched_at = Some(now);
        self.stale_until = policy.stale_time.map(|window| now + window);
        self.status = EntryStatus::Success;
        self.error = None;
        self.degraded = degraded;
    }
}
