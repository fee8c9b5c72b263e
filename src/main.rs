//! Driftwatch CLI entrypoint.
//!
//! This is the main entrypoint for the driftwatch command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use driftwatch::cli::{Cli, Commands, OutputFormatter};
use driftwatch::config::{find_config_file, ConfigParser, ConfigValidator, DriftConfig};
use driftwatch::error::{ConfigError, Result};
use driftwatch::notify::{notify_slack, webhook_from_env, NotifyOutcome};
use driftwatch::report::{ScanOutcome, Summary};
use driftwatch::runner::{TerraformRunner, WorkspaceTarget, SCAN_ERROR_EXIT_CODE};
use driftwatch::scanner::Scanner;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Options for the scan command.
struct ScanOptions {
    /// Planning binary override.
    binary: Option<String>,
    /// Webhook override.
    slack_webhook: Option<String>,
    /// Skip notifications.
    no_notify: bool,
}

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return fatal_exit_code();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            fatal_exit_code()
        }
    }
}

/// Exit code when the scan could not run at all.
fn fatal_exit_code() -> ExitCode {
    u8::try_from(SCAN_ERROR_EXIT_CODE).map_or(ExitCode::FAILURE, ExitCode::from)
}

/// Initializes the logging system on stderr.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Scan {
            binary,
            slack_webhook,
            no_notify,
        } => {
            let options = ScanOptions {
                binary,
                slack_webhook,
                no_notify,
            };
            cmd_scan(cli.config.as_ref(), options, &formatter).await
        }
        Commands::Validate { warnings } => {
            cmd_validate(cli.config.as_ref(), warnings, &formatter).map(|()| ExitCode::SUCCESS)
        }
        Commands::Init { path, force } => cmd_init(&path, force).map(|()| ExitCode::SUCCESS),
    }
}

/// Scan all workspaces for drift.
async fn cmd_scan(
    config_path: Option<&PathBuf>,
    options: ScanOptions,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    ConfigValidator::new().validate(&config)?;

    let binary = config.resolve_binary(options.binary.as_deref());
    info!("Using planning binary: {binary}");

    let runner = TerraformRunner::new(binary);
    let targets: Vec<WorkspaceTarget> = config
        .workspaces
        .iter()
        .map(WorkspaceTarget::new)
        .collect();

    let results = Scanner::new(&runner).scan_all(&targets);
    let summary = Summary::from_results(&results);
    let outcome = ScanOutcome::from_summary(&summary);

    let report = formatter.format_report(&results, &summary, outcome)?;
    writeln!(std::io::stdout().lock(), "{report}")?;

    if options.no_notify {
        debug!("Notifications disabled");
    } else {
        let explicit = options.slack_webhook.or_else(webhook_from_env);
        match config.resolve_webhook(explicit.as_deref()) {
            Some(url) => report_notification("slack", notify_slack(&url, &results).await),
            None => debug!("No Slack webhook configured, skipping notification"),
        }
    }

    info!("Scan finished: {outcome}");
    Ok(outcome.into())
}

/// Reports a notification outcome; failures never change the exit code.
fn report_notification(name: &str, outcome: NotifyOutcome) {
    match outcome {
        NotifyOutcome::Failed(e) => eprintln!("Warning: {name} notification failed: {e}"),
        NotifyOutcome::Delivered => debug!("{name} notification delivered"),
        NotifyOutcome::Skipped => debug!("{name} notification skipped"),
    }
}

/// Validate configuration.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let config = load_config(config_path)?;

    let result = ConfigValidator::new().check(&config);

    let output = formatter.format_validation(&config, &result, show_warnings)?;
    writeln!(std::io::stdout().lock(), "{output}")?;

    match result.errors.first() {
        Some(first) => Err(ConfigError::validation(first.message.clone(), first.field.clone()).into()),
        None => Ok(()),
    }
}

/// Write a starter configuration file.
fn cmd_init(path: &Path, force: bool) -> Result<()> {
    info!("Initializing driftwatch configuration in: {}", path.display());

    let config_path = path.join("driftwatch.yml");

    if !force && config_path.exists() {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite.");
        return Ok(());
    }

    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    let config_template = include_str!("../templates/driftwatch.yml");
    std::fs::write(&config_path, config_template)?;
    eprintln!("Created: {}", config_path.display());

    eprintln!("\nNext steps:");
    eprintln!("  1. List your workspace directories in driftwatch.yml");
    eprintln!("  2. Run: driftwatch validate");
    eprintln!("  3. Run: driftwatch scan");

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the configuration file path, searching upward from the
/// current directory when none was given.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.clone()),
        None => find_config_file(std::env::current_dir()?),
    }
}

/// Loads `.env` next to the configuration file, then the file itself.
fn load_config(config_path: Option<&PathBuf>) -> Result<DriftConfig> {
    let config_file = resolve_config_path(config_path)?;
    debug!("Loading configuration from: {}", config_file.display());

    let parser = ConfigParser::new().with_base_path(
        config_file
            .parent()
            .unwrap_or_else(|| Path::new(".")),
    );
    if let Err(e) = parser.load_dotenv() {
        warn!("{e}");
    }

    parser.load_file(&config_file)
}
