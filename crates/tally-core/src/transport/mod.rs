//! HTTP transport to the Tally backend
//!
//! Every call resolves against one configured base URL and reads the
//! [`Session`](crate::auth::Session) at dispatch time to attach the bearer
//! header.

mod client;
mod payload;

pub use client::ApiClient;
pub use payload::{Download, FilePart};
