//! `trustscope status`

use std::process::ExitCode;

use console::style;

use crate::state::AppState;

pub async fn cmd_status(state: &AppState) -> anyhow::Result<ExitCode> {
    let config = state.get_config().await?;
    let services = state.services().await?;

    println!("Service:      {}", config.base_url);
    println!("Default tier: {}", config.default_tier.as_str());
    if let Some(proxy) = &config.proxy {
        println!("Proxy:        {}://{}:{}", proxy.protocol.scheme(), proxy.host, proxy.port);
    }

    let Some(account) = &services.account else {
        return Ok(ExitCode::SUCCESS);
    };

    match account.user_status().await {
        Ok(status) if status.authenticated => {
            println!(
                "Account:      {} ({})",
                status.email.as_deref().unwrap_or("unknown"),
                status.tier().as_str()
            );
            match status.remaining_today() {
                Some(remaining) => println!("Remaining:    {} analyses today", remaining),
                None => println!("Remaining:    unlimited"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(_) => {
            println!("Account:      not signed in");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} Service unreachable: {}", style("✗").red(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
