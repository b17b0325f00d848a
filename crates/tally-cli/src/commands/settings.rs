//! Preferences

use super::failure;
use crate::console::CliConsole;
use crate::render;
use anyhow::Result;
use tally_core::{TallyClient, YearMonth};

pub fn budget(client: &TallyClient, console: &CliConsole, value: Option<String>) -> Result<()> {
    match value {
        None => {
            match client.monthly_budget() {
                Some(budget) => console.field("Monthly budget", &render::format_amount(budget)),
                None => console.field("Monthly budget", "not set"),
            }
            Ok(())
        }
        Some(value) => {
            client
                .set_monthly_budget(&value)
                .map_err(|e| failure(e, "Could not save budget"))?;
            match client.monthly_budget() {
                Some(budget) => {
                    console.success(&format!("Budget set to {}", render::format_amount(budget)))
                }
                None => console.success("Budget cleared"),
            }
            Ok(())
        }
    }
}

pub fn month(client: &TallyClient, console: &CliConsole, value: Option<YearMonth>) -> Result<()> {
    match value {
        None => console.field("Selected month", &client.selected_month().to_string()),
        Some(month) => {
            client
                .select_month(month)
                .map_err(|e| failure(e, "Could not save month"))?;
            console.success(&format!("Selected month is now {}", month));
        }
    }
    Ok(())
}
