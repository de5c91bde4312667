//! One engine invocation: validate, scan, plan, execute, prune.
//!
//! Everything that can reject a request happens before the first mutation,
//! so a run either starts clean or does not start at all.

use tracing::{error, info, warn};

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::errors::EngineError;
use crate::fs_ops::{
    ExecuteOptions, FsMover, Mover, Plan, ensure_root, execute_with, plan_flatten, plan_transform,
    prune_empty_dirs, scan_root, scan_tree,
};
use crate::report::{BatchReport, Response};
use crate::request::{Job, Operation};

/// Compute the plan for `job` without touching anything.
pub fn plan(job: &Job, cfg: &Config) -> Result<Plan, EngineError> {
    let op = job.params.build()?;
    let root = ensure_root(&job.root)?;
    let opts = cfg.scan_options();
    let plan = match &op {
        Operation::Rename(transform) => {
            let scan = scan_root(&root, job.scope, &opts)?;
            plan_transform(&root, &scan, transform)
        }
        Operation::Flatten => {
            let scan = scan_tree(&root, &opts)?;
            plan_flatten(&root, &scan)
        }
    };
    Ok(plan)
}

/// Run `job` against the filesystem.
pub fn run(job: &Job, cfg: &Config, cancel: &CancelToken) -> Result<BatchReport, EngineError> {
    run_with(job, cfg, cancel, &FsMover)
}

/// Run with a caller-supplied mover.
pub fn run_with(
    job: &Job,
    cfg: &Config,
    cancel: &CancelToken,
    mover: &dyn Mover,
) -> Result<BatchReport, EngineError> {
    info!(
        root = %job.root.display(),
        kind = job.params.kind().as_str(),
        scope = %job.scope,
        dry_run = cfg.dry_run,
        "Starting run"
    );
    let mut plan = plan(job, cfg)?;

    if cancel.is_cancelled() {
        return Err(EngineError::Interrupted);
    }

    let opts = ExecuteOptions {
        dry_run: cfg.dry_run,
        cancel: cancel.clone(),
    };
    let mut report = execute_with(&mut plan, &opts, mover);

    if !plan.prune.is_empty() {
        if cfg.dry_run {
            report.info(format!(
                "Dry run: {} folder(s) would be checked for pruning",
                plan.prune.len()
            ));
        } else if report.cancelled {
            warn!("Skipping folder pruning after cancellation");
        } else {
            prune_empty_dirs(&plan.prune, &mut report);
        }
    }

    info!(summary = %report.summary(), "Run finished");
    Ok(report)
}

/// Run `job` and fold the outcome into the response envelope.
pub fn respond(job: &Job, cfg: &Config, cancel: &CancelToken) -> Response {
    match run(job, cfg, cancel) {
        Ok(report) => Response::from_report(&report),
        Err(e) => {
            log_engine_error(&e);
            Response::from_error(&e)
        }
    }
}

/// Emit a structured error line for a request-level failure.
pub fn log_engine_error(e: &EngineError) {
    let code = e.code();
    let kind = e.kind();
    match e {
        EngineError::RootNotFound(path) | EngineError::RootNotDirectory(path) => {
            error!(code, kind, path = %path.display(), "Request rejected")
        }
        EngineError::Scan { path, reason } => {
            error!(code, kind, path = %path.display(), %reason, "Scan failed")
        }
        EngineError::InvalidPattern { pattern, reason } => {
            error!(code, kind, %pattern, %reason, "Request rejected")
        }
        EngineError::InvalidParams { kind: what, reason } => {
            error!(code, kind, params = %what, %reason, "Request rejected")
        }
        EngineError::Interrupted => error!(code, kind, "Run aborted by user"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::Scope;
    use crate::report::Status;
    use crate::request::TransformParams;
    use std::fs;

    fn job(root: &std::path::Path, params: TransformParams) -> Job {
        Job {
            root: root.to_path_buf(),
            scope: Scope::Both,
            params,
        }
    }

    #[test]
    fn invalid_pattern_rejected_before_scan() {
        let j = job(
            std::path::Path::new("/definitely/not/here"),
            TransformParams::DeleteMatches {
                pattern: "(".into(),
            },
        );
        let err = run(&j, &Config::default(), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern { .. }));
    }

    #[test]
    fn cancelled_before_execution_is_interrupted() {
        let td = tempfile::tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"a").unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let j = job(td.path(), TransformParams::AddPrefix { prefix: "x_".into() });
        let err = run(&j, &Config::default(), &cancel).unwrap_err();
        assert!(matches!(err, EngineError::Interrupted));
        assert!(td.path().join("a.txt").exists());
    }

    #[test]
    fn missing_root_is_an_error_response() {
        let td = tempfile::tempdir().unwrap();
        let j = job(&td.path().join("gone"), TransformParams::ExtractNumeric);
        let resp = respond(&j, &Config::default(), &CancelToken::new());
        assert_eq!(resp.status, Status::Error);
        assert_eq!(resp.error_kind.as_deref(), Some("root_not_found"));
    }

    #[test]
    fn dry_run_flatten_leaves_tree_alone() {
        let td = tempfile::tempdir().unwrap();
        fs::create_dir(td.path().join("sub")).unwrap();
        fs::write(td.path().join("sub/a.txt"), b"a").unwrap();
        let cfg = Config {
            dry_run: true,
            ..Default::default()
        };
        let report = run(&job(td.path(), TransformParams::Flatten), &cfg, &CancelToken::new()).unwrap();
        assert_eq!(report.previewed.len(), 1);
        assert!(report.applied.is_empty());
        assert!(td.path().join("sub/a.txt").exists());
        assert!(report.pruned.is_empty());
    }
}
