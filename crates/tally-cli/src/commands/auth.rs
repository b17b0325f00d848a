//! Login, signup and logout

use super::failure;
use crate::console::CliConsole;
use anyhow::Result;
use tally_core::TallyClient;

fn password_or_prompt(console: &CliConsole, password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(console.password("Password")?),
    }
}

pub async fn login(
    client: &TallyClient,
    console: &CliConsole,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = password_or_prompt(console, password)?;
    let spinner = console.spinner("Signing in");
    let result = client.login(email, &password).await;
    spinner.finish_and_clear();

    result.map_err(|e| failure(e, "Login failed"))?;
    console.success(&format!("Signed in as {}", email));
    Ok(())
}

pub async fn signup(
    client: &TallyClient,
    console: &CliConsole,
    name: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = password_or_prompt(console, password)?;
    let spinner = console.spinner("Creating account");
    let result = client.signup(name, email, &password).await;
    spinner.finish_and_clear();

    result.map_err(|e| failure(e, "Signup failed"))?;
    console.success(&format!("Welcome, {}! You are signed in.", name.trim()));
    Ok(())
}

pub fn logout(client: &TallyClient, console: &CliConsole) -> Result<()> {
    if !client.session().is_authenticated() {
        console.warn("No active session");
        return Ok(());
    }
    client.logout()?;
    console.success("Signed out");
    Ok(())
}
