//! repo-chronicle main entry point
//!
//! This is the command-line interface for the repository history aggregator.

use clap::Parser;
use repo_chronicle::config::{load_config, Config};
use repo_chronicle::output::print_statistics;
use repo_chronicle::{run_chronicle, Credential};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// repo-chronicle: collect a repository's history into one text file
///
/// Writes the local commit log followed by every pull request with its
/// comments, one record per line, in a fixed order.
#[derive(Parser, Debug)]
#[command(name = "repo-chronicle")]
#[command(version)]
#[command(about = "Collects commit and pull request history into one text file", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without any request
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_chronicle(config, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("repo_chronicle=info,warn"),
            1 => EnvFilter::new("repo_chronicle=debug,info"),
            2 => EnvFilter::new("repo_chronicle=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== repo-chronicle Dry Run ===\n");

    println!("Repository: {}", config.repository_slug());
    println!("  Local path: {}", config.repository.local_path);
    println!("  Start URL: {}", config.start_url()?);
    println!("  Request delay: {}ms", config.api.request_delay_ms);

    println!("\nUser Agent: {}", repo_chronicle::crawler::user_agent(&config.user_agent));

    println!("\nAuth:");
    println!("  Username: {}", config.auth.username);
    let token_state = if std::env::var(&config.auth.token_env).is_ok() {
        "set"
    } else {
        "NOT SET"
    };
    println!("  Token variable: {} ({})", config.auth.token_env, token_state);

    println!("\nOutput:");
    println!("  File: {}", config.output.path);
    println!("  Include commits: {}", config.output.include_commits);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main run: credential, then the staged chronicle
async fn handle_chronicle(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let credential = Credential::from_env(&config.auth)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current pull request");
            on_interrupt.cancel();
        }
    });

    tracing::info!("Collecting history of {}", config.repository_slug());

    match run_chronicle(&config, credential, cancel).await {
        Ok(stats) => {
            tracing::info!("History written to {}", config.output.path);
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Chronicle failed: {}", e);
            if let (Some(stage), Some(url)) = (e.stage(), e.url()) {
                tracing::error!("Failed during {} of {}", stage, url);
            }
            Err(e.into())
        }
    }
}
