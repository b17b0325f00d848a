//! Command implementations, one module per view

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod export;
pub mod history;
pub mod insights;
pub mod profile;
pub mod settings;
pub mod upload;

use anyhow::Result;
use tally_core::{Query, TallyClient, TallyError, YearMonth};

/// Unwrap a cached read, preferring the server's detail over `fallback`
pub fn settle<T>(query: Query<T>, fallback: &str) -> Result<T> {
    query.into_result().map_err(|e| failure(e, fallback))
}

/// Wrap a failed operation with the message shown to the user
pub fn failure(error: TallyError, fallback: &str) -> anyhow::Error {
    let message = error.user_message(fallback);
    anyhow::Error::new(error).context(message)
}

/// Month to show: the one asked for, which becomes the selected month, or
/// the selected month
pub fn resolve_month(client: &TallyClient, requested: Option<YearMonth>) -> Result<YearMonth> {
    match requested {
        Some(month) if month != client.selected_month() => {
            client.select_month(month)?;
            Ok(month)
        }
        Some(month) => Ok(month),
        None => Ok(client.selected_month()),
    }
}
