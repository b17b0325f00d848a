//! Error types for the Tally client
//!
//! One error enum covers every failure the client layer can surface:
//! - `Auth`: missing or rejected credentials
//! - `Network`: no response was received
//! - `Server`: a non-2xx response, with the server's optional `detail` text
//! - `Validation`: local pre-submission checks; never reaches the network
//!
//! The remaining variants cover configuration, persistence and decoding.

mod constructors;
mod detail;
mod types;
mod user_messages;

pub use detail::{extract_detail, sanitize_server_text};
pub use types::{TallyError, TallyResult};
pub use user_messages::ErrorCategory;
