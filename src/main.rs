use std::{path::Path, process::ExitCode, sync::Arc, time::Duration};

use clap::Parser;
use dropsweep::{
    api::{ApiError, DoClient},
    config::SweeperConfig,
    observability::init_tracing,
    sweep::{LogReporter, Sweeper, run_sweep_worker},
};
use tokio_util::sync::CancellationToken;

/// CLI arguments for dropsweep
#[derive(Parser, Debug)]
#[command(version, about = "Stale droplet housekeeping for DigitalOcean accounts", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file
    #[arg(short, long, global = true, default_value = "./dropsweep.json")]
    config: String,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run scheduled sweeps until interrupted (default)
    Run,
    /// Run a single sweep and exit
    Once,
    /// Write a default configuration file
    Init {
        /// Path to create the config file (defaults to ./dropsweep.json)
        #[arg(short, long)]
        output: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match args.command {
        Some(Command::Init { output, force }) => run_init(output, force),
        Some(Command::Once) => run_once(&args.config).await,
        Some(Command::Run) | None => run_daemon(&args.config).await,
    }
}

/// Load the config file and initialize logging from it.
///
/// Errors here happen before tracing is up, so they go to stderr.
fn load_and_init(config_path: &str) -> Option<SweeperConfig> {
    let config = match SweeperConfig::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config from {config_path}: {e}");
            return None;
        }
    };

    if let Err(e) = init_tracing(&config.observability.logging) {
        eprintln!("Error initializing logging: {e}");
        return None;
    }

    Some(config)
}

fn build_sweeper(config: &SweeperConfig) -> Result<Arc<Sweeper>, ApiError> {
    let client = Arc::new(DoClient::from_config(&config.api)?);

    Ok(Arc::new(Sweeper::new(
        client,
        Arc::new(LogReporter),
        &config.sweep,
    )))
}

/// Run scheduled sweeps until SIGINT/SIGTERM.
async fn run_daemon(config_path: &str) -> ExitCode {
    let Some(config) = load_and_init(config_path) else {
        return ExitCode::FAILURE;
    };

    tracing::info!(config = config_path, "Starting dropsweep");

    let sweeper = match build_sweeper(&config) {
        Ok(sweeper) => sweeper,
        Err(e) => {
            tracing::error!(error = %e, "Failed to construct API client");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let worker = tokio::spawn(run_sweep_worker(
        sweeper,
        config.sweep.clone(),
        cancel.clone(),
    ));

    shutdown_signal().await;

    tracing::info!("Shutdown signal received, waiting for the current sweep to finish...");
    cancel.cancel();

    match tokio::time::timeout(Duration::from_secs(30), worker).await {
        Ok(Ok(())) => tracing::info!("Shutdown complete"),
        Ok(Err(e)) => tracing::error!(error = %e, "Sweep worker panicked"),
        Err(_) => tracing::warn!("Timeout waiting for the sweep worker, exiting anyway"),
    }

    ExitCode::SUCCESS
}

/// Run a single sweep and exit. Useful for external schedulers and smoke
/// tests; the exit code reflects whether the inventory fetch succeeded.
async fn run_once(config_path: &str) -> ExitCode {
    let Some(config) = load_and_init(config_path) else {
        return ExitCode::FAILURE;
    };

    let sweeper = match build_sweeper(&config) {
        Ok(sweeper) => sweeper,
        Err(e) => {
            tracing::error!(error = %e, "Failed to construct API client");
            return ExitCode::FAILURE;
        }
    };

    let summary = sweeper.sweep(&CancellationToken::new()).await;

    if summary.fetch_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Write a default configuration file.
fn run_init(output: Option<String>, force: bool) -> ExitCode {
    let path = output.unwrap_or_else(|| "./dropsweep.json".to_string());

    if Path::new(&path).exists() && !force {
        eprintln!("Config file already exists: {path}\nUse --force to overwrite.");
        return ExitCode::FAILURE;
    }

    if let Err(e) = std::fs::write(&path, default_config_json()) {
        eprintln!("Failed to write {path}: {e}");
        return ExitCode::FAILURE;
    }

    println!("Wrote default config to {path}");
    println!("Set the DO_API_TOKEN environment variable before running.");

    ExitCode::SUCCESS
}

/// Default configuration for first-time setup.
/// Dry-run by default: stale droplets are logged, not deleted.
fn default_config_json() -> &'static str {
    r#"{
  "api": {
    "token": "${DO_API_TOKEN}"
  },
  "sweep": {
    "threshold_secs": 86400,
    "delete_stale": false,
    "interval_secs": 3600
  },
  "observability": {
    "logging": { "level": "info", "format": "compact" }
  }
}
"#
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
