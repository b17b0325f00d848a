//! CLI console utilities

use colored::*;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

/// CLI console for formatted output
pub struct CliConsole {
    json: bool,
}

impl CliConsole {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Whether output should be raw JSON
    pub fn json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    pub fn hint(&self, message: &str) {
        eprintln!("  {} {}", "→".dimmed(), message.dimmed());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Print a `label: value` line
    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<18} {}", format!("{label}:").dimmed(), value);
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Spinner shown while a request is pending
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.json || !Term::stderr().is_term() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Read a password without echoing it
    pub fn password(&self, prompt: &str) -> io::Result<String> {
        let term = Term::stderr();
        term.write_str(&format!("{} {}: ", "?".blue().bold(), prompt))?;
        term.read_secure_line()
    }
}
