//! Anomalies and per-month category totals

use super::{resolve_month, settle};
use crate::console::CliConsole;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use tally_core::charts::category_bars;
use tally_core::models::CategoryTotal;
use tally_core::{TallyClient, YearMonth};

pub async fn anomalies(
    client: &TallyClient,
    console: &CliConsole,
    month: Option<YearMonth>,
) -> Result<()> {
    let month = resolve_month(client, month)?;
    let spinner = console.spinner("Looking for anomalies");
    let query = client.anomalies(month).await;
    spinner.finish_and_clear();
    let points = settle(query, "Failed to load anomalies")?;

    if console.json() {
        return console.print_json(&points);
    }

    console.print_header(&format!("Anomalies · {}", month));
    if points.is_empty() {
        console.success("Nothing unusual this month");
        return Ok(());
    }
    for point in &points {
        println!(
            "  {}  {:<36} {:>12}  {}",
            point.date.get(..10).unwrap_or(&point.date).dimmed(),
            point.description,
            render::format_amount(point.amount),
            format!("z={:.1}", point.zscore).yellow()
        );
    }
    Ok(())
}

pub async fn month_summary(
    client: &TallyClient,
    console: &CliConsole,
    month: Option<YearMonth>,
) -> Result<()> {
    let month = resolve_month(client, month)?;
    let spinner = console.spinner("Loading month summary");
    let query = client.month_summary(month).await;
    spinner.finish_and_clear();
    let summary = settle(query, "Failed to load month summary")?;

    if console.json() {
        return console.print_json(&summary);
    }

    console.print_header(&format!("Summary · {}", summary.month));
    console.field("Total spend", &render::format_amount(summary.total_spend));
    let totals: Vec<CategoryTotal> = summary
        .by_category
        .iter()
        .map(|(category, total)| CategoryTotal {
            category: category.clone(),
            total: *total,
        })
        .collect();
    println!();
    for line in render::bars(&category_bars(&totals)) {
        println!("  {}", line);
    }
    Ok(())
}
