//! Tally Core Library
//!
//! Client-side session, caching, and synchronization layer for the Tally
//! personal-finance service: the bearer session, the transport every request
//! goes through, a query cache with per-resource freshness and invalidation,
//! persisted preferences, chart geometry, and the mutations that keep views
//! consistent after uploads and profile changes.

pub mod auth;
pub mod cache;
pub mod charts;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod preferences;
pub mod transport;

// Re-export commonly used types
pub use auth::{Admission, AuthToken, Session, SessionGuard, View};
pub use cache::{CacheKey, CacheManager, EntryStatus, Namespace, Query, QuerySlot, SlotRead};
pub use client::{TallyClient, TallyClientBuilder};
pub use config::{ClientConfig, load_config};
pub use error::{ErrorCategory, TallyError, TallyResult};
pub use export::{BlobStore, ExportFormat};
pub use pipeline::{UploadOutcome, UploadPipeline};
pub use preferences::{PreferenceStore, YearMonth};
pub use transport::{ApiClient, Download, FilePart};
