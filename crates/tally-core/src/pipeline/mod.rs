//! Mutations and the cache invalidation each one fans out
//!
//! Every mutation here either fails without touching the cache or completes
//! its whole invalidation set before returning.

mod auth;
mod month;
mod profile;
mod upload;

pub use auth::{login, logout, signup};
pub use month::{MONTH_SCOPED, select_month};
pub use profile::{update_profile, upload_avatar};
pub use upload::{UPLOAD_INVALIDATES, UploadOutcome, UploadPipeline};
