//! Export download

use super::failure;
use crate::console::CliConsole;
use anyhow::Result;
use std::path::Path;
use tally_core::{ExportFormat, TallyClient, YearMonth};

pub async fn run(
    client: &TallyClient,
    console: &CliConsole,
    format: ExportFormat,
    month: Option<YearMonth>,
    out: &Path,
) -> Result<()> {
    let spinner = console.spinner(&format!("Exporting {}", format.file_name(month)));
    let result = client.export(format, month, out).await;
    spinner.finish_and_clear();

    let saved = result.map_err(|e| failure(e, "Export failed"))?;
    console.success(&format!("Saved {}", saved.display()));
    Ok(())
}
