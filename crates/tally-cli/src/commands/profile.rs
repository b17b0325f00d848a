//! Profile view

use super::{failure, settle};
use crate::console::CliConsole;
use anyhow::Result;
use std::path::Path;
use tally_core::TallyClient;
use tally_core::models::ProfileUpdate;

pub async fn show(client: &TallyClient, console: &CliConsole) -> Result<()> {
    let profile = settle(client.profile().await, "Failed to load profile")?;

    if console.json() {
        return console.print_json(&profile);
    }

    let dash = || "—".to_string();
    console.print_header("Profile");
    console.field("Name", &profile.name);
    console.field("Email", &profile.email);
    console.field("Mobile", &profile.mobile.clone().unwrap_or_else(dash));
    console.field(
        "Date of birth",
        &profile.date_of_birth.clone().unwrap_or_else(dash),
    );
    console.field("Avatar", &profile.avatar_url.clone().unwrap_or_else(dash));
    if let Some(created) = &profile.created_at {
        console.field("Member since", created.get(..10).unwrap_or(created));
    }
    Ok(())
}

pub async fn update(
    client: &TallyClient,
    console: &CliConsole,
    name: Option<String>,
    mobile: Option<String>,
    date_of_birth: Option<String>,
) -> Result<()> {
    let update = ProfileUpdate {
        name,
        mobile,
        date_of_birth,
    };
    let profile = client
        .update_profile(&update)
        .await
        .map_err(|e| failure(e, "Profile update failed"))?;
    console.success(&format!("Profile updated for {}", profile.name));
    Ok(())
}

pub async fn avatar(client: &TallyClient, console: &CliConsole, file: &Path) -> Result<()> {
    let spinner = console.spinner("Uploading avatar");
    let result = client.upload_avatar(file).await;
    spinner.finish_and_clear();
    let response = result.map_err(|e| failure(e, "Avatar upload failed"))?;
    console.success(&format!("Avatar updated: {}", response.avatar_url));
    Ok(())
}
