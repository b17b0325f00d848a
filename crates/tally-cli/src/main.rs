//! Tally command-line client
//!
//! One subcommand per view of the finance service:
//!
//! ```bash
//! tally login --email asha@example.com
//! tally upload statements/feb.csv
//! tally dashboard --month 2026-02
//! tally insights --generate
//! tally export csv --month 2026-02 --out ~/Downloads
//! ```
//!
//! Set `RUST_LOG=tally_core=debug` (or pass `--verbose`) to watch cache hits,
//! coalesced reads and invalidations.

mod args;
mod commands;
mod console;
mod render;
mod router;

use crate::args::Cli;
use crate::console::CliConsole;
use clap::Parser;
use tally_core::TallyError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = router::route(cli).await {
        report(&err);
        std::process::exit(1);
    }
}

fn report(err: &anyhow::Error) {
    let console = CliConsole::new(false);
    console.error(&err.to_string());

    if let Some(tally) = err.downcast_ref::<TallyError>() {
        if let Some(hint) = tally.category().hint() {
            console.hint(hint);
        }
    }
}
