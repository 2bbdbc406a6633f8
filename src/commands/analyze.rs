//! `trustscope analyze`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgGroup, Args};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use trustscope_core::{
    AnalysisInput, FileInput, Outcome, ProgressResolution, SessionEvent, Tier, ToolKind,
};

use crate::services::{share_text, SubmitResult};
use crate::state::AppState;

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["text", "url", "file"])))]
pub struct AnalyzeArgs {
    /// Tool to run: image, news, speech, youtube-speech, unified
    #[arg(long)]
    pub tool: ToolKind,

    /// Text to analyze
    #[arg(long)]
    pub text: Option<String>,

    /// URL to analyze
    #[arg(long)]
    pub url: Option<String>,

    /// File to upload (image, audio or video)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Use the pro tier
    #[arg(long)]
    pub pro: bool,

    /// Analysis type for image and unified analysis
    #[arg(long)]
    pub analysis_type: Option<String>,

    /// Write the PDF report here after a successful analysis
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Print a share summary after a successful analysis
    #[arg(long)]
    pub share: bool,
}

impl AnalyzeArgs {
    fn input(&self) -> anyhow::Result<AnalysisInput> {
        if let Some(text) = &self.text {
            return Ok(AnalysisInput::Text(text.clone()));
        }
        if let Some(url) = &self.url {
            return Ok(AnalysisInput::Url(url.clone()));
        }
        let path = self
            .file
            .as_ref()
            .context("one of --text, --url or --file is required")?;
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(AnalysisInput::File(FileInput::new(file_name, bytes)))
    }
}

/// Render simulated progress for one tool until the simulator resolves.
fn spawn_progress_bar(
    mut events: broadcast::Receiver<SessionEvent>,
    tool: ToolKind,
) -> JoinHandle<()> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            };
            if event.tool() != tool {
                continue;
            }
            match event {
                SessionEvent::StageAdvanced { label, .. } => pb.set_message(label),
                SessionEvent::Progress { percent, .. } => pb.set_position(percent.round() as u64),
                SessionEvent::ProgressResolved {
                    percent,
                    resolution,
                    ..
                } => {
                    pb.set_position(percent.round() as u64);
                    match resolution {
                        ProgressResolution::Completed => pb.finish_with_message("done"),
                        ProgressResolution::Cancelled => pb.abandon_with_message("cancelled"),
                    }
                    break;
                }
                SessionEvent::StatusChanged { status, .. } if status.is_terminal() => break,
                SessionEvent::StatusChanged { .. } => {}
            }
        }
    })
}

pub async fn cmd_analyze(state: &AppState, args: AnalyzeArgs, verbose: bool) -> anyhow::Result<ExitCode> {
    let config = state.get_config().await?;
    let services = state.services().await?;
    let tool = args.tool;
    let tier = if args.pro { Tier::Pro } else { config.default_tier };
    let input = args.input()?;

    let render = spawn_progress_bar(services.gateway.subscribe(), tool);

    let result = tokio::select! {
        result = services.gateway.submit(tool, input, tier) => result,
        _ = tokio::signal::ctrl_c() => {
            services.gateway.cancel(tool);
            let _ = render.await;
            eprintln!("{} Analysis cancelled", style("!").yellow());
            return Ok(ExitCode::FAILURE);
        }
    };

    let (session_id, outcome) = match result {
        SubmitResult::Finished {
            session_id,
            outcome,
        } => {
            let _ = render.await;
            (session_id, outcome)
        }
        SubmitResult::Rejected => {
            render.abort();
            eprintln!("{} An analysis for {} is already running", style("!").yellow(), tool);
            return Ok(ExitCode::FAILURE);
        }
        SubmitResult::Discarded { .. } => {
            render.abort();
            eprintln!("{} Analysis cancelled", style("!").yellow());
            return Ok(ExitCode::FAILURE);
        }
    };

    let payload = match outcome {
        Outcome::Success { payload } => payload,
        Outcome::Failure {
            kind,
            message,
            detail,
        } => {
            eprintln!("{} {}", style("✗").red(), message);
            if verbose || config.debug_mode {
                eprintln!("  kind: {}", kind);
                if let Some(detail) = detail {
                    eprintln!("  detail: {}", detail);
                }
                eprintln!("  session: {}", session_id);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("{} {} complete", style("✓").green(), tool.label());
    println!("{}", serde_json::to_string_pretty(&payload)?);

    if let Some(account) = &services.account {
        if let Err(e) = account.track_usage(tool).await {
            tracing::warn!(tool = %tool, error = %e, "failed to record usage");
        }
    }

    if args.share {
        println!();
        println!("{}", share_text(tool, &payload));
    }

    if let Some(path) = &args.pdf {
        let written = services.export.export_to_file(tool, path).await?;
        println!(
            "{} PDF report written to {} ({} bytes)",
            style("✓").green(),
            path.display(),
            written
        );
    }

    Ok(ExitCode::SUCCESS)
}
