//! @ai:module:intent CLI for replaying upstream diagnostics and publishing the check run
//! @ai:module:layer presentation
//! @ai:module:depends_on checkrun_core, publish, config, output

use anyhow::{Context, Result};
use checkrun::{
    checkrun_core::{self, RunResult},
    client::{Credentials, GitHubClient},
    config::CheckrunConfig,
    output::{format_summary, write_summary, OutputFormat},
    publish::{build_request, CheckRunPublisher},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "checkrun")]
#[command(about = "Aggregate CI diagnostics and publish them as a GitHub check run")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log diagnostics from a file and publish the aggregated check run
    Report(ReportArgs),

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "checkrun.toml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// Diagnostics file (JSON array or JSON Lines)
    #[arg(short, long)]
    input: PathBuf,

    /// Repository root that paths are reported relative to
    #[arg(long, default_value = ".")]
    repo_root: PathBuf,

    /// Check name; overrides `report.tool_name` from the config
    #[arg(short, long)]
    tool: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "checkrun.toml")]
    config: PathBuf,

    /// Repository owner
    #[arg(long, required_unless_present = "dry_run")]
    owner: Option<String>,

    /// Repository name
    #[arg(long, required_unless_present = "dry_run")]
    repo: Option<String>,

    /// Commit the check run is attached to
    #[arg(long, required_unless_present = "dry_run")]
    sha: Option<String>,

    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print the check-run request instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Write the summary to this file instead of stderr
    #[arg(long)]
    summary_file: Option<PathBuf>,

    /// Summary format
    #[arg(long, short, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("checkrun=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report(args) => report(args).await,
        Commands::Init { output } => init_config(output).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// @ai:intent Replay diagnostics into a run, publish once, and map the outcome to an exit code
/// @ai:effects fs:read, network, io
async fn report(args: ReportArgs) -> Result<ExitCode> {
    let config = CheckrunConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    let tool_name = args.tool.unwrap_or_else(|| config.report.tool_name.clone());
    if !args.repo_root.is_dir() {
        anyhow::bail!("Repository root {} not found", args.repo_root.display());
    }

    let records = checkrun_core::load_records(&args.input)
        .with_context(|| format!("Failed to load diagnostics from {}", args.input.display()))?;
    tracing::info!("Loaded {} diagnostics from {}", records.len(), args.input.display());

    // Root and diagnostic paths are both resolved lexically, never through symlinks.
    let mut run = RunResult::new(&args.repo_root, tool_name.clone());
    tracing::debug!("Reporting paths relative to {}", run.repo_root().display());

    let aborted = match checkrun_core::replay(&records, &mut run) {
        Ok(()) => None,
        Err(checkrun_core::Error::RunAborted { message }) => {
            tracing::warn!("Check sequence aborted: {}", message);
            Some(message)
        }
        Err(e) => return Err(e.into()),
    };

    let title = config.report.title_for(&tool_name);

    let outcome = if args.dry_run {
        let request = build_request(&run, args.sha.as_deref().unwrap_or("HEAD"), &title);
        println!("{}", serde_json::to_string_pretty(&request)?);
        None
    } else {
        let (owner, repo, sha) = match (args.owner, args.repo, args.sha) {
            (Some(owner), Some(repo), Some(sha)) => (owner, repo, sha),
            _ => anyhow::bail!("--owner, --repo and --sha are required unless --dry-run is set"),
        };
        let token = args
            .token
            .context("No API token: pass --token or set GITHUB_TOKEN")?;

        let credentials = Credentials {
            token,
            client_name: config.api.user_agent.clone(),
        };
        let client = GitHubClient::new(config.api.clone(), credentials)?;
        let publisher = CheckRunPublisher::new(client).with_title(title);

        Some(
            publisher
                .publish(&mut run, &owner, &repo, &sha)
                .await
                .context("Failed to publish check run")?,
        )
    };

    let summary = run.summary();
    let format: OutputFormat = args.format.into();
    let rendered = format_summary(&summary, outcome.as_ref(), aborted.as_deref(), format);
    // Stdout carries the protocol lines, so the summary never goes there.
    write_summary(&rendered, args.summary_file.as_deref())
        .context("Failed to write summary")?;

    if run.success() && aborted.is_none() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// @ai:intent Write the default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    if output.exists() {
        anyhow::bail!("Config file already exists: {}", output.display());
    }

    CheckrunConfig::default().save(&output)?;
    println!("Created configuration file: {}", output.display());
    Ok(())
}
