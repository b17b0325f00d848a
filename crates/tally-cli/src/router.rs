//! Command routing logic for CLI

use crate::args::{Cli, Commands, ProfileAction, SettingsAction};
use crate::commands;
use crate::console::CliConsole;
use anyhow::Result;
use tally_core::{Admission, TallyClient, TallyError, View, load_config};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let client = TallyClient::new(config)?;
    let console = CliConsole::new(cli.json);

    admit(&client, view_for(&cli.command))?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&client, &console, &email, password).await
        }
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::signup(&client, &console, &name, &email, password).await,
        Commands::Logout => commands::auth::logout(&client, &console),
        Commands::Dashboard { month, refresh } => {
            commands::dashboard::show(&client, &console, month, refresh).await
        }
        Commands::History { limit } => commands::history::show(&client, &console, limit).await,
        Commands::Upload { file } => commands::upload::run(&client, &console, &file).await,
        Commands::Insights {
            month,
            generate,
            advanced,
            chart,
        } => {
            commands::insights::show(&client, &console, month, generate, advanced, chart).await
        }
        Commands::Anomalies { month } => {
            commands::analytics::anomalies(&client, &console, month).await
        }
        Commands::Summary { month } => {
            commands::analytics::month_summary(&client, &console, month).await
        }
        Commands::Export { format, month, out } => {
            commands::export::run(&client, &console, format, month, &out).await
        }
        Commands::Profile { action } => match action.unwrap_or(ProfileAction::Show) {
            ProfileAction::Show => commands::profile::show(&client, &console).await,
            ProfileAction::Update { name, mobile, dob } => {
                commands::profile::update(&client, &console, name, mobile, dob).await
            }
            ProfileAction::Avatar { file } => {
                commands::profile::avatar(&client, &console, &file).await
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Budget { value } => {
                commands::settings::budget(&client, &console, value)
            }
            SettingsAction::Month { value } => commands::settings::month(&client, &console, value),
        },
        Commands::Categorize { description } => {
            commands::history::categorize(&client, &console, &description).await
        }
    }
}

/// View each command renders
fn view_for(command: &Commands) -> View {
    match command {
        Commands::Login { .. } | Commands::Logout => View::Login,
        Commands::Signup { .. } => View::Signup,
        Commands::Dashboard { .. } => View::Dashboard,
        Commands::History { .. } | Commands::Categorize { .. } => View::History,
        Commands::Upload { .. } => View::Upload,
        Commands::Insights { .. } => View::Insights,
        Commands::Anomalies { .. } | Commands::Summary { .. } => View::Anomalies,
        Commands::Export { .. } => View::Export,
        Commands::Profile { .. } => View::Profile,
        Commands::Settings { .. } => View::Settings,
    }
}

fn admit(client: &TallyClient, view: View) -> Result<()> {
    match client.admit(view) {
        Admission::Render(_) => Ok(()),
        Admission::Redirect(target) => {
            tracing::debug!(view = %view, redirect = %target, "session guard redirected");
            Err(TallyError::auth(format!("Sign in to open {}", view)).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_views_for_commands() {
        let cli = Cli::try_parse_from(["tally", "upload", "feb.csv"]).unwrap();
        assert_eq!(view_for(&cli.command), View::Upload);

        let cli = Cli::try_parse_from(["tally", "logout"]).unwrap();
        assert!(!view_for(&cli.command).is_protected());

        let cli = Cli::try_parse_from(["tally", "settings", "budget", "25000"]).unwrap();
        assert!(view_for(&cli.command).is_protected());
    }
}
