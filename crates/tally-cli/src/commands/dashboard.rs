//! Dashboard view

use super::{resolve_month, settle};
use crate::console::CliConsole;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tally_core::charts::{BarInput, BarLayout, bar_ratios};
use tally_core::{TallyClient, YearMonth};

/// Trend points shown on the dashboard
const TREND_POINTS: usize = 10;

pub async fn show(
    client: &TallyClient,
    console: &CliConsole,
    month: Option<YearMonth>,
    refresh: bool,
) -> Result<()> {
    let month = resolve_month(client, month)?;

    let spinner = console.spinner("Loading dashboard");
    let summary = async {
        if refresh {
            client.refresh_dashboard(month).await
        } else {
            client.dashboard(month).await
        }
    };
    let (summary, trend, recent) =
        tokio::join!(summary, client.trend(), client.dashboard_recent());
    spinner.finish_and_clear();

    let degraded = summary.degraded;
    let summary = settle(summary, "Failed to load dashboard")?;
    let trend = settle(trend, "Failed to load trend")?;
    let recent = settle(recent, "Failed to load recent transactions")?;

    if console.json() {
        return console.print_json(&json!({
            "summary": summary,
            "trend": trend,
            "recent": recent,
        }));
    }

    console.print_header(&format!("Dashboard · {}", month));
    if degraded {
        console.warn("Totals are unavailable right now; showing zeros");
    }
    console.field("Total spend", &render::format_amount(summary.total_spend));
    console.field(
        "Top category",
        &match &summary.top_category {
            Some(category) => format!(
                "{} ({})",
                category,
                render::format_amount(summary.top_category_spend)
            ),
            None => "—".to_string(),
        },
    );
    console.field(
        "Avg confidence",
        &summary
            .confidence_percent()
            .map(|pct| format!("{}%", pct))
            .unwrap_or_else(|| "—".to_string()),
    );

    println!();
    println!("{}", "Spend trend".bold());
    let start = trend.len().saturating_sub(TREND_POINTS);
    let inputs: Vec<BarInput> = trend[start..].iter().map(BarInput::from).collect();
    if inputs.is_empty() {
        println!("  {}", "No data yet. Upload a CSV to get started.".dimmed());
    }
    for line in render::bars(&BarLayout::default().bars(&bar_ratios(&inputs))) {
        println!("  {}", line);
    }

    println!();
    println!("{}", "Recent transactions".bold());
    if recent.is_empty() {
        println!("  {}", "No transactions".dimmed());
    }
    for record in &recent {
        println!(
            "  {}  {:<32} {:>12}  {}",
            record.day().dimmed(),
            truncate(&record.description, 32),
            render::format_amount(record.amount),
            record.category.as_deref().unwrap_or("Uncategorized").cyan()
        );
    }

    Ok(())
}

/// Cut `text` to `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
