//! Transaction history and categorization

use super::dashboard::truncate;
use super::{failure, settle};
use crate::console::CliConsole;
use crate::render;
use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use tally_core::TallyClient;

fn display_date(day: &str) -> String {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_else(|_| day.to_string())
}

pub async fn show(client: &TallyClient, console: &CliConsole, limit: Option<u32>) -> Result<()> {
    let spinner = console.spinner("Loading history");
    let records = client.history(limit).await;
    spinner.finish_and_clear();
    let records = settle(records, "Failed to load history")?;

    if console.json() {
        return console.print_json(&records);
    }

    console.print_header(&format!("History ({} transactions)", records.len()));
    for record in &records {
        let confidence = record
            .confidence_percent()
            .map(|pct| format!("{:>3}%", pct))
            .unwrap_or_else(|| "   —".to_string());
        println!(
            "  {}  {:<36} {:>12}  {:<16} {}",
            display_date(record.day()).dimmed(),
            truncate(&record.description, 36),
            render::format_amount(record.amount),
            record.category.as_deref().unwrap_or("Uncategorized"),
            confidence.dimmed()
        );
    }
    Ok(())
}

pub async fn categorize(client: &TallyClient, console: &CliConsole, description: &str) -> Result<()> {
    let result = client
        .categorize(description)
        .await
        .map_err(|e| failure(e, "Categorization failed"))?;

    if console.json() {
        return console.print_json(&result);
    }

    console.field("Category", &result.category.bold().to_string());
    console.field(
        "Confidence",
        &format!("{:.0}% ({})", result.confidence * 100.0, result.source),
    );
    if !result.explanation.is_empty() {
        console.field("Why", &result.explanation);
    }
    Ok(())
}
