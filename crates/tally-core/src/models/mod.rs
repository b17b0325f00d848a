//! Records exchanged with the Tally backend
//!
//! Server records are immutable snapshots: the client replaces whole cache
//! entries and never edits them in place.

mod analytics;
mod auth;
mod insights;
mod transactions;
mod users;

pub use analytics::{AnomalyPoint, DashboardSummary, TrendPoint};
pub use auth::{LoginRequest, SignupRequest, TokenResponse, UserPublic};
pub use insights::{AdvancedInsights, CategoryShare, CategoryTotal, InsightsReport};
pub use transactions::{CategorizeResponse, MonthSummary, TransactionRecord, UploadResponse};
pub use users::{AvatarUploadResponse, ProfileUpdate, UserProfile};
