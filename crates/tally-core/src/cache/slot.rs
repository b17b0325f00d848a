//! Per-view query handle
//!
//! A view that changes its parameters (a different month, say) moves to a
//! new key. Reads started under the previous key may still complete; the
//! slot reports those as superseded so the view never renders them.

use super::CacheManager;
use super::types::{CacheKey, Query};
use crate::error::TallyResult;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;

/// Result of a read through a [`QuerySlot`]
#[derive(Debug, Clone)]
pub enum SlotRead<T> {
    /// The read belongs to the slot's current key
    Current(Query<T>),
    /// The slot moved to another key while this read was pending
    Superseded { key: CacheKey },
}

impl<T> SlotRead<T> {
    pub fn current(self) -> Option<Query<T>> {
        match self {
            Self::Current(query) => Some(query),
            Self::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

#[derive(Debug, Default)]
struct SlotState {
    key: Option<CacheKey>,
    generation: u64,
}

/// Tracks which key a view currently displays
#[derive(Debug)]
pub struct QuerySlot {
    cache: CacheManager,
    state: Mutex<SlotState>,
}

impl QuerySlot {
    pub fn new(cache: CacheManager) -> Self {
        Self {
            cache,
            state: Mutex::new(SlotState::default()),
        }
    }

    /// Key of the most recent read
    pub fn key(&self) -> Option<CacheKey> {
        self.state.lock().key.clone()
    }

    fn ticket(&self, key: &CacheKey) -> u64 {
        let mut state = self.state.lock();
        if state.key.as_ref() != Some(key) {
            state.key = Some(key.clone());
            state.generation += 1;
        }
        state.generation
    }

    /// Read through the cache, discarding the result if the slot moved on
    pub async fn read<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> SlotRead<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TallyResult<T>> + Send + 'static,
    {
        let ticket = self.ticket(&key);
        let query = self.cache.read(key.clone(), fetcher).await;

        if self.state.lock().generation == ticket {
            SlotRead::Current(query)
        } else {
            debug!(key = %key, "discarding superseded read");
            SlotRead::Superseded { key }
        }
    }
}
