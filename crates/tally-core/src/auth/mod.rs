//! Authentication state
//!
//! Provides:
//! - The bearer credential and its persisted storage
//! - The process-wide [`Session`] handle every transport call reads from
//! - [`SessionGuard`], which admits or redirects protected views

mod guard;
mod session;
mod token;

pub use guard::{Admission, SessionGuard, View};
pub use session::Session;
pub use token::{AuthToken, FileTokenStorage, MemoryTokenStorage, StoredToken, TokenStorage};
