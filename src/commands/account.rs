//! `trustscope contact` and `trustscope beta-signup`

use std::process::ExitCode;

use anyhow::Context;
use console::style;

use trustscope_client::{AccountClient, ContactRequest};

use crate::state::AppState;

async fn account_client(state: &AppState) -> anyhow::Result<AccountClient> {
    state
        .services()
        .await?
        .account
        .context("Account endpoints are not configured")
}

pub async fn cmd_contact(
    state: &AppState,
    name: String,
    email: String,
    message: String,
) -> anyhow::Result<ExitCode> {
    let account = account_client(state).await?;
    let request = ContactRequest {
        name,
        email,
        message,
    };

    match account.contact(&request).await {
        Ok(_) => {
            println!("{} Message sent", style("✓").green());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} Could not send message: {}", style("✗").red(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn cmd_beta_signup(state: &AppState, email: String) -> anyhow::Result<ExitCode> {
    let account = account_client(state).await?;

    match account.beta_signup(&email).await {
        Ok(_) => {
            println!("{} {} is on the beta list", style("✓").green(), email);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} Beta signup failed: {}", style("✗").red(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
