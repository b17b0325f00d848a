//! CSV upload

use super::failure;
use crate::console::CliConsole;
use anyhow::Result;
use serde_json::json;
use std::path::Path;
use tally_core::TallyClient;

pub async fn run(client: &TallyClient, console: &CliConsole, file: &Path) -> Result<()> {
    let spinner = console.spinner(&format!("Uploading {}", file.display()));
    let result = client.upload(file).await;
    spinner.finish_and_clear();
    let outcome = result.map_err(|e| failure(e, "Upload failed"))?;

    if console.json() {
        return console.print_json(&json!({
            "inserted": outcome.inserted,
            "selected_month": outcome.selected_month.map(|m| m.to_string()),
        }));
    }

    console.success(&format!("Uploaded {} transactions", outcome.inserted));
    if let Some(month) = outcome.selected_month {
        console.success(&format!("Now showing {}", month));
    }
    Ok(())
}
