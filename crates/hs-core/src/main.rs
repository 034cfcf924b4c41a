//! hotswap - staged deployment updater.
//!
//! Applies a packaged release over the application directory it sits
//! next to: stage existing files aside, extract, recycle the configured
//! services, sweep leftovers. `--rollback` reverses the last update
//! from the preserved backups, given the same package.

use clap::Parser;
use hs_config::{resolve_config_path, UpdaterConfig};
use hs_core::lifecycle::{self, RunContext, Stage};
use hs_core::logging::{init_logging, LogConfig, LogFormat};
use hs_core::output::{print_summary, OutputFormat};
use hs_core::recycle::CommandController;
use hs_core::{ExitCode, RunMode};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// hotswap - atomic file swap, service recycle, and rollback
#[derive(Parser)]
#[command(name = "hotswap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reverse the previous update instead of applying one (requires
    /// the same release package)
    #[arg(long)]
    rollback: bool,

    /// Target root directory (defaults to the directory the updater
    /// binary runs from)
    #[arg(long, env = "HOTSWAP_ROOT")]
    root: Option<PathBuf>,

    /// Config file path (default: updater.conf in the target root;
    /// HOTSWAP_CONFIG also recognized)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run summary format on stdout
    #[arg(long, short = 'f', default_value = "text")]
    format: OutputFormat,

    /// Log output format on stderr
    #[arg(long, default_value = "human")]
    log_format: LogFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Exit non-zero when recycling or cleanup reported failures
    #[arg(long)]
    strict: bool,

    /// Skip the delayed-exit timer (exit as soon as the run finishes)
    #[arg(long)]
    no_delay: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        tracing::Level::ERROR
    } else {
        match cli.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };
    init_logging(&LogConfig {
        level,
        format: cli.log_format,
    });

    let exit_code = run_cli(&cli);
    info!(stage = %Stage::Terminated, code = exit_code.as_i32(), "Terminating");
    std::process::exit(exit_code.as_i32());
}

fn run_cli(cli: &Cli) -> ExitCode {
    let target_root = match resolve_target_root(cli.root.clone()) {
        Ok(root) => root,
        Err(e) => {
            error!(error = %e, "Cannot determine target root");
            return ExitCode::InternalError;
        }
    };

    let (config_path, config_source) = resolve_config_path(cli.config.as_deref(), &target_root);
    let config = match UpdaterConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            let err = hs_core::UpdateError::Config(e);
            error!(
                path = %config_path.display(),
                source = %config_source,
                error = %err,
                "Configuration error"
            );
            return ExitCode::from(&err);
        }
    };

    let mode = if cli.rollback {
        RunMode::Rollback
    } else {
        RunMode::Update
    };

    let controller = CommandController::new(&config.recycle_command);
    let exit_delay = if cli.no_delay {
        Duration::ZERO
    } else {
        Duration::from_secs(config.exit_delay_secs)
    };
    let ctx = RunContext {
        target_root,
        config,
        mode,
    };

    match lifecycle::run(&ctx, &controller) {
        Ok(summary) => {
            print_summary(cli.format, &summary);
            lifecycle::schedule_exit(exit_delay)
                .join()
                .unwrap_or_default();
            if cli.strict && summary.warnings() > 0 {
                ExitCode::CompletedWithWarnings
            } else {
                ExitCode::Clean
            }
        }
        Err(e) => {
            error!(mode = %mode, error = %e, "Run failed");
            ExitCode::from(&e)
        }
    }
}

/// The updater runs beside the application it updates, so the default
/// target root is the directory the binary was launched from.
fn resolve_target_root(cli_root: Option<PathBuf>) -> std::io::Result<PathBuf> {
    if let Some(root) = cli_root {
        return Ok(root);
    }
    if let Some(dir) = std::env::current_exe()?.parent() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
}
