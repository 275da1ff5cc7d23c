//! lu-hut CLI
//!
//! Entry point for the `lu` executable: self-update, rollback and version
//! reporting.

mod cli;
mod commands;
mod output;
mod version;

use clap::Parser;
use lu_core::{ConfigLoader, RuntimeConfig};
use lu_update::check::DEFAULT_PROBE_TIMEOUT;
use lu_update::{detect_install_mode, FileMarker, InstallRules, ReleaseManager, UpdateGate};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    output::set_quiet(cli.quiet);

    let config = load_config();
    let color = config.display.color_enabled && !cli.no_color;
    if !color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // update and rollback already talk to the release API or must stay offline
    let notify = !cli.quiet && !matches!(cli.command, Commands::Update(_) | Commands::Rollback);

    let result = match cli.command {
        Commands::Update(args) => commands::update::run(args, &config).await,
        Commands::Rollback => commands::rollback::run(&config),
        Commands::Version(args) => commands::version::run(args),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        return ExitCode::FAILURE;
    }

    if notify {
        notify_if_outdated(&config, color).await;
    }

    ExitCode::SUCCESS
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Warnings only by default; -v/-vv/-vvv for progress detail
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load the user configuration, falling back to defaults
fn load_config() -> RuntimeConfig {
    match ConfigLoader::new().and_then(|loader| loader.load()) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "failed to load configuration, using defaults");
            RuntimeConfig::default()
        }
    }
}

/// Print the "new version available" line at most once per interval
async fn notify_if_outdated(config: &RuntimeConfig, color: bool) {
    if !config.update_check.enabled {
        return;
    }

    let marker = match FileMarker::in_state_dir() {
        Ok(marker) => marker,
        Err(e) => {
            debug!(error = %e, "no state directory, skipping update check");
            return;
        }
    };

    let source = match ReleaseManager::new(config.github.clone(), &config.network) {
        Ok(source) => source,
        Err(e) => {
            debug!(error = %e, "could not build release client, skipping update check");
            return;
        }
    };

    let mode = detect_install_mode(&InstallRules::with_config(&config.install.managed_paths));
    let interval = Duration::from_secs(config.update_check.interval_hours.saturating_mul(3600));

    // Never wait longer than an ordinary metadata request would
    let probe_timeout =
        Duration::from_secs(config.network.http_timeout_secs).min(DEFAULT_PROBE_TIMEOUT);

    UpdateGate::new(source, marker, mode)
        .with_interval(interval)
        .with_probe_timeout(probe_timeout)
        .with_color(color)
        .check_and_notify()
        .await;
}
