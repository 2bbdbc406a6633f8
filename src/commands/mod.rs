//! CLI Commands
//!
//! Command-line parser and dispatch. Each subcommand lives in its own module.

mod account;
mod analyze;
mod config;
mod status;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use trustscope_client::{AdapterRegistry, ImageAdapter, UnifiedAdapter};

use crate::state::AppState;
use crate::storage::ConfigService;

pub use analyze::AnalyzeArgs;

#[derive(Parser)]
#[command(name = "trustscope")]
#[command(about = "Submit content to the TrustScope analysis service")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ~/.trustscope/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze text, a URL, or a file
    Analyze(AnalyzeArgs),

    /// Show account status and service settings
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Send a message through the contact form
    Contact {
        /// Your name
        #[arg(long)]
        name: String,
        /// Reply address
        #[arg(long)]
        email: String,
        /// Message body
        message: String,
    },

    /// Join the beta waiting list
    BetaSignup {
        email: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Set the analysis service origin
    SetBaseUrl {
        /// e.g. https://api.trustscope.app
        url: String,
    },
    /// Set the tier used when --pro is not given
    SetTier {
        /// free or pro
        tier: trustscope_core::Tier,
    },
    /// Restore defaults
    Reset,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut adapters = AdapterRegistry::with_defaults();
    if let Commands::Analyze(args) = &cli.command {
        if let Some(analysis_type) = &args.analysis_type {
            adapters.register(std::sync::Arc::new(ImageAdapter::new(analysis_type.clone())));
            adapters.register(std::sync::Arc::new(UnifiedAdapter::new(analysis_type.clone())));
        }
    }

    let config = match cli.config {
        Some(path) => ConfigService::open(path)?,
        None => ConfigService::new()?,
    };

    let state = AppState::new();
    state.initialize_with(config, adapters).await?;

    match cli.command {
        Commands::Analyze(args) => analyze::cmd_analyze(&state, args, cli.verbose).await,
        Commands::Status => status::cmd_status(&state).await,
        Commands::Config { command } => config::cmd_config(&state, command).await,
        Commands::Contact {
            name,
            email,
            message,
        } => account::cmd_contact(&state, name, email, message).await,
        Commands::BetaSignup { email } => account::cmd_beta_signup(&state, email).await,
    }
}
