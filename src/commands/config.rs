//! `trustscope config`

use std::process::ExitCode;

use console::style;

use crate::models::settings::SettingsUpdate;
use crate::state::AppState;

use super::ConfigCommands;

pub async fn cmd_config(state: &AppState, command: ConfigCommands) -> anyhow::Result<ExitCode> {
    match command {
        ConfigCommands::Show => {
            let path = state
                .with_config_mut(|c| Ok(c.path().to_path_buf()))
                .await?;
            let config = state.get_config().await?;
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::SetBaseUrl { url } => {
            let updated = state
                .update_config(SettingsUpdate {
                    base_url: Some(url),
                    ..Default::default()
                })
                .await?;
            println!("{} base_url = {}", style("✓").green(), updated.base_url);
        }
        ConfigCommands::SetTier { tier } => {
            let updated = state
                .update_config(SettingsUpdate {
                    default_tier: Some(tier),
                    ..Default::default()
                })
                .await?;
            println!(
                "{} default_tier = {}",
                style("✓").green(),
                updated.default_tier.as_str()
            );
        }
        ConfigCommands::Reset => {
            state.with_config_mut(|c| c.reset()).await?;
            println!("{} Configuration reset to defaults", style("✓").green());
        }
    }
    Ok(ExitCode::SUCCESS)
}
