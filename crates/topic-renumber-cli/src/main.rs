//! topic-renumber CLI - per-area/type topic number migration.

mod prompt;

use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use topic_renumber::config::DEFAULT_SERVICE_ACCOUNT;
use topic_renumber::{
    Config, FileStore, MigrationResult, Orchestrator, RenumberError, RunStatus, ServiceAccount,
};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "topic-renumber")]
#[command(about = "Renumber topic numbers densely per area and initiative type")]
#[command(version)]
struct Cli {
    /// Compute and report the plan without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Path to the service account credential
    #[arg(long, default_value = DEFAULT_SERVICE_ACCOUNT)]
    service_account: PathBuf,

    /// Path to YAML configuration file (built-in defaults if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the collection file path from the configuration
    #[arg(long)]
    store: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    /// Seconds to wait for the current batch after a shutdown signal
    #[arg(long, default_value = "60")]
    shutdown_timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), RenumberError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format, cli.log_file.as_deref())?;

    // Credentials first: nothing touches the store without them.
    let account = ServiceAccount::load(&cli.service_account)?;
    info!(
        "Using service account {} (project {})",
        account.client_email, account.project_id
    );

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::default(),
    };
    if let Some(path) = cli.store {
        config.store.path = path;
    }
    config.validate()?;

    let cancel_token = setup_signal_handler(cli.shutdown_timeout).await?;

    let store = FileStore::new(&config.store, config.fields.clone()).with_credentials(&account);
    info!(
        "Collection '{}' in {}",
        config.store.collection,
        store.path().display()
    );

    let skip_prompt = cli.yes;
    let result = Orchestrator::new(config, Arc::new(store))
        .run(cli.dry_run, Some(cancel_token), |report| {
            if skip_prompt {
                Ok(true)
            } else {
                Ok(prompt::confirm_migration(report)?)
            }
        })
        .await?;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        print_summary(&result);
    }

    Ok(())
}

fn print_summary(result: &MigrationResult) {
    let status_msg = match result.status {
        RunStatus::DryRun => "Dry run completed!",
        RunStatus::Completed => "Migration completed!",
        RunStatus::Cancelled => "Migration cancelled by user.",
    };
    println!("\n{}", status_msg);
    println!("  Run ID: {}", result.run_id);
    println!("  Duration: {:.2}s", result.duration_seconds);
    println!(
        "  Initiatives: {} ({} soft-deleted)",
        result.report.total_records, result.report.soft_deleted
    );
    println!("  Groups: {}", result.report.partitions.len());

    let execution = &result.execution;
    if execution.dry_run {
        println!(
            "  Would apply: {} createdAt, {} topicNumber",
            execution.would_apply_backfills, execution.would_apply_renumbers
        );
    } else {
        println!(
            "  Applied: {} createdAt, {} topicNumber in {} batches",
            execution.backfills_applied,
            execution.renumbers_applied,
            execution.batches_committed
        );
    }
}

/// Install stderr logging plus an optional plain-text log file.
fn setup_logging(
    verbosity: &str,
    format: &str,
    log_file: Option<&Path>,
) -> Result<(), RenumberError> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    };

    let console = if format == "json" {
        fmt::layer()
            .json()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(level)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| RenumberError::Config(format!("failed to initialize logging: {}", e)))
}

/// Cancel the returned token on SIGINT/SIGTERM, and force an exit if the
/// current batch has not finished within `shutdown_timeout` seconds.
#[cfg(unix)]
async fn setup_signal_handler(shutdown_timeout: u64) -> Result<CancellationToken, RenumberError> {
    let cancel_token = CancellationToken::new();
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let token = cancel_token.clone();
    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        };
        eprintln!(
            "\nReceived {}. Stopping after the current batch (timeout: {}s)...",
            name, shutdown_timeout
        );
        token.cancel();
        force_exit_after(shutdown_timeout).await;
    });

    Ok(cancel_token)
}

#[cfg(not(unix))]
async fn setup_signal_handler(shutdown_timeout: u64) -> Result<CancellationToken, RenumberError> {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Failed to listen for Ctrl-C");
            return;
        }
        eprintln!("\nReceived Ctrl-C. Stopping after the current batch...");
        token.cancel();
        force_exit_after(shutdown_timeout).await;
    });

    Ok(cancel_token)
}

async fn force_exit_after(shutdown_timeout: u64) {
    tokio::time::sleep(Duration::from_secs(shutdown_timeout)).await;
    warn!("Shutdown timeout of {}s exceeded, exiting", shutdown_timeout);
    std::process::exit(i32::from(RenumberError::Cancelled.exit_code()));
}
