//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tally_core::{ExportFormat, YearMonth};

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Tally - track spending, budgets and insights from the terminal")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (default: ~/.config/tally/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// End the session
    Logout,

    /// Monthly totals, spend trend and recent transactions
    Dashboard {
        /// Month to show (YYYY-MM); defaults to the selected month
        #[arg(long)]
        month: Option<YearMonth>,
        /// Ignore cached totals
        #[arg(long)]
        refresh: bool,
    },

    /// Transaction history
    History {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Upload a CSV of transactions
    Upload { file: PathBuf },

    /// AI spending summary and category breakdown
    Insights {
        #[arg(long)]
        month: Option<YearMonth>,
        /// Request a new summary instead of the cached one
        #[arg(long)]
        generate: bool,
        /// Use the extended report, which takes the monthly budget into account
        #[arg(long)]
        advanced: bool,
        #[arg(long, value_enum, default_value = "pie")]
        chart: ChartKind,
    },

    /// Unusually large transactions
    Anomalies {
        #[arg(long)]
        month: Option<YearMonth>,
    },

    /// Per-category totals for one month
    Summary {
        #[arg(long)]
        month: Option<YearMonth>,
    },

    /// Download transactions as CSV or PDF
    Export {
        format: ExportFormat,
        /// Restrict to one month (YYYY-MM)
        #[arg(long)]
        month: Option<YearMonth>,
        /// Directory to save into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Preferences shared by every view
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Guess the category of a transaction description
    Categorize { description: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
    },
    /// Upload a new avatar image
    Avatar { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show or set the monthly budget in INR; an empty value clears it
    Budget { value: Option<String> },
    /// Show or set the selected month (YYYY-MM)
    Month { value: Option<YearMonth> },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}
