//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the Ctrl-C handler,
//! optionally locks the root, runs the engine and renders the result.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use namesmith::cli::Args;
use namesmith::config::{CONFIG_ENV, config_path, create_template_config, load_config};
use namesmith::engine::{log_engine_error, run as run_engine};
use namesmith::fs_ops::{RootLock, io_error_with_help, try_acquire_root_lock};
use namesmith::output as out;
use namesmith::{BatchReport, CancelToken, EngineError, Job, Response};

use crate::logging::init_tracing;

/// Exit status when the batch ran but some items failed.
const EXIT_ITEM_FAILURES: u8 = 2;
/// Exit status for request-level errors.
const EXIT_REQUEST_ERROR: u8 = 1;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    // Config location queries happen before logging init
    if args.print_config {
        print_config_location();
        return Ok(ExitCode::SUCCESS);
    }
    if args.init_config {
        let Some(path) = config_path() else {
            bail!("Could not determine a config path; set {CONFIG_ENV}");
        };
        create_template_config(&path)?;
        out::print_success(&format!("A template namesmith config was written to: {}", path.display()));
        return Ok(ExitCode::SUCCESS);
    }

    let (mut cfg, cfg_path) = load_config()?;
    args.apply_overrides(&mut cfg);
    cfg.validate()?;

    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;
    if let Some(p) = &cfg_path {
        debug!(path = %p.display(), "Using config file");
    }
    debug!(?args, "Starting namesmith");

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.cancel();
            out::print_warn("Received interrupt; stopping after the current item...");
        })
        .context("failed to install signal handler")?;
    }

    let job = match args.to_job() {
        Ok(Some(job)) => job,
        Ok(None) => bail!("No command given; run with --help to see the available commands"),
        Err(e) => return Ok(request_failed(&e, args.json_report)),
    };

    let _lock = if args.lock { lock_root(&job)? } else { None };

    match run_engine(&job, &cfg, &cancel) {
        Ok(report) => finish(&report, args.json_report),
        Err(e) => Ok(request_failed(&e, args.json_report)),
    }
}

fn print_config_location() {
    if let Ok(explicit) = std::env::var(CONFIG_ENV)
        && !explicit.is_empty()
    {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {explicit}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match config_path() {
        Some(p) => {
            out::print_info(&format!("Default namesmith config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

/// Lock the root when it exists; a missing root is left for the engine to report.
fn lock_root(job: &Job) -> Result<Option<RootLock>> {
    if !job.root.is_dir() {
        return Ok(None);
    }
    match try_acquire_root_lock(&job.root) {
        Ok(Some(lock)) => {
            debug!(path = %lock.path().display(), "Acquired root lock");
            Ok(Some(lock))
        }
        Ok(None) => bail!(
            "Another namesmith run holds the lock on {}",
            job.root.display()
        ),
        Err(e) => Err(io_error_with_help("lock", &job.root)(e)),
    }
}

fn finish(report: &BatchReport, json_report: bool) -> Result<ExitCode> {
    if json_report {
        out::print_response_json(&Response::from_report(report))?;
    } else {
        out::print_report(report);
    }
    let failed = report.failed.len();
    info!(failed, cancelled = report.cancelled, "Done");
    if failed > 0 {
        Ok(ExitCode::from(EXIT_ITEM_FAILURES))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn request_failed(e: &EngineError, json_report: bool) -> ExitCode {
    log_engine_error(e);
    if json_report {
        if let Err(err) = out::print_response_json(&Response::from_error(e)) {
            out::print_error(&format!("{err:#}"));
        }
    } else {
        out::print_error(&e.to_string());
    }
    ExitCode::from(EXIT_REQUEST_ERROR)
}
