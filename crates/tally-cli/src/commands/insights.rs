//! Insights view

use super::{resolve_month, settle};
use crate::args::ChartKind;
use crate::console::CliConsole;
use crate::render;
use anyhow::Result;
use colored::Colorize;
use tally_core::charts::{category_bars, category_pie};
use tally_core::models::{CategoryShare, CategoryTotal};
use tally_core::{TallyClient, YearMonth};

pub async fn show(
    client: &TallyClient,
    console: &CliConsole,
    month: Option<YearMonth>,
    generate: bool,
    advanced: bool,
    chart: ChartKind,
) -> Result<()> {
    let month = resolve_month(client, month)?;
    let spinner = console.spinner(if generate {
        "Generating insights"
    } else {
        "Loading insights"
    });

    let (summary, breakdown, shares) = if advanced {
        let report = settle(
            client.advanced_insights(month, generate).await,
            "Failed to load insights",
        );
        spinner.finish_and_clear();
        let report = report?;
        if console.json() {
            return console.print_json(&report);
        }
        let shares = report.shares();
        if let Some(budget) = report.budget_inr {
            console.field("Budget", &render::format_amount(budget));
        }
        (report.summary.unwrap_or_default(), report.breakdown, shares)
    } else {
        let query = if generate {
            client.generate_insights(month).await
        } else {
            client.insights_summary(month).await
        };
        spinner.finish_and_clear();
        let report = settle(query, "Failed to generate insights")?;
        if console.json() {
            return console.print_json(&report);
        }
        let shares = report.shares();
        (report.summary, report.breakdown, shares)
    };

    print_report(console, month, &summary, &breakdown, &shares, chart);
    Ok(())
}

fn print_report(
    console: &CliConsole,
    month: YearMonth,
    summary: &str,
    breakdown: &[CategoryTotal],
    shares: &[CategoryShare],
    chart: ChartKind,
) {
    console.print_header(&format!("Insights · {}", month));
    if summary.trim().is_empty() {
        println!("  {}", "No summary yet. Run with --generate.".dimmed());
    } else {
        for line in summary.lines() {
            println!("  {}", line);
        }
    }

    println!();
    println!("{}", "Category breakdown".bold());
    let lines = match chart {
        ChartKind::Pie => render::pie(&category_pie(shares)),
        ChartKind::Bar => render::bars(&category_bars(breakdown)),
    };
    for line in lines {
        println!("  {}", line);
    }
}
