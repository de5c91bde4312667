//! Batch outcome model.
//!
//! `BatchReport` is what the executor hands back: counts plus one detail
//! list per outcome. `Response` is the serializable envelope a front end
//! prints or ships over the wire.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Why an entry was left alone. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoMatch,
    AlreadyPrefixed,
    AlreadySuffixed,
    AlreadyNumeric,
    NoDigits,
    NoChange,
    EmptyResult,
    InvalidName,
    Filtered,
    Symlink,
    SpecialFile,
    NonUtf8Name,
    Cancelled,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoMatch => "no match",
            SkipReason::AlreadyPrefixed => "already prefixed",
            SkipReason::AlreadySuffixed => "already suffixed",
            SkipReason::AlreadyNumeric => "already numeric",
            SkipReason::NoDigits => "no digits",
            SkipReason::NoChange => "unchanged",
            SkipReason::EmptyResult => "empty result",
            SkipReason::InvalidName => "invalid name",
            SkipReason::Filtered => "filtered",
            SkipReason::Symlink => "symlink",
            SkipReason::SpecialFile => "special file",
            SkipReason::NonUtf8Name => "non-UTF-8 name",
            SkipReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SkipReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub source: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub error: String,
}

/// A directory the pruning pass left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneSkip {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCounts {
    pub planned: usize,
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub pruned_dirs: usize,
}

/// Aggregate result of one run.
///
/// `applied` reflects what is on disk after the run. In dry-run mode nothing
/// moves, so intended moves are listed in `previewed` instead.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub cancelled: bool,
    pub planned: usize,
    pub applied: Vec<AppliedMove>,
    pub previewed: Vec<AppliedMove>,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<FailedItem>,
    pub pruned: Vec<PathBuf>,
    pub prune_skipped: Vec<PruneSkip>,
    /// Human-readable log lines tagged `[SUCCESS]`, `[INFO]`, `[WARN]` or `[ERROR]`.
    pub messages: Vec<String>,
}

impl BatchReport {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
            ..Default::default()
        }
    }

    pub fn counts(&self) -> BatchCounts {
        BatchCounts {
            planned: self.planned,
            applied: self.applied.len(),
            skipped: self.skipped.len(),
            failed: self.failed.len(),
            pruned_dirs: self.pruned.len(),
        }
    }

    /// True when every attempted item succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn info(&mut self, msg: impl AsRef<str>) {
        self.messages.push(format!("[INFO] {}", msg.as_ref()));
    }

    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.messages.push(format!("[WARN] {}", msg.as_ref()));
    }

    pub(crate) fn record_applied(&mut self, source: &Path, destination: &Path) {
        self.messages.push(format!(
            "[SUCCESS] {} -> {}",
            display_name(source),
            display_name(destination)
        ));
        self.applied.push(AppliedMove {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }

    pub(crate) fn record_previewed(&mut self, source: &Path, destination: &Path) {
        self.info(format!(
            "Would rename {} -> {}",
            display_name(source),
            display_name(destination)
        ));
        self.previewed.push(AppliedMove {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }

    pub(crate) fn record_skipped(&mut self, source: &Path, reason: SkipReason) {
        self.info(format!("Skipped {} ({reason})", display_name(source)));
        self.skipped.push(SkippedItem {
            source: source.to_path_buf(),
            reason,
        });
    }

    pub(crate) fn record_failed(&mut self, source: &Path, destination: &Path, error: String) {
        self.messages
            .push(format!("[ERROR] {}: {error}", display_name(source)));
        self.failed.push(FailedItem {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            error,
        });
    }

    pub(crate) fn record_pruned(&mut self, dir: &Path) {
        self.info(format!("Removed empty folder {}", dir.display()));
        self.pruned.push(dir.to_path_buf());
    }

    pub(crate) fn record_prune_skip(&mut self, dir: &Path, reason: String) {
        self.warn(format!("Kept folder {}: {reason}", dir.display()));
        self.prune_skipped.push(PruneSkip {
            path: dir.to_path_buf(),
            reason,
        });
    }

    /// One-line outcome used as the response message.
    pub fn summary(&self) -> String {
        let c = self.counts();
        if self.dry_run {
            return format!(
                "Dry run: {} of {} items would change, {} skipped",
                self.previewed.len(),
                c.planned + c.skipped,
                c.skipped
            );
        }
        let mut s = format!(
            "Processed {} items: {} applied, {} skipped, {} failed",
            c.applied + c.skipped + c.failed,
            c.applied,
            c.skipped,
            c.failed
        );
        if c.pruned_dirs > 0 || !self.prune_skipped.is_empty() {
            s.push_str(&format!(
                "; removed {} empty folders, kept {}",
                c.pruned_dirs,
                self.prune_skipped.len()
            ));
        }
        if self.cancelled {
            s.push_str(" (cancelled)");
        }
        s
    }
}

fn display_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedFileDetail {
    pub file: String,
    pub destination_folder: String,
    pub moved_to_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFileDetail {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moved_files_details: Vec<MovedFileDetail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_files_details: Vec<SkippedFileDetail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_details: Vec<ErrorDetail>,
    #[serde(flatten)]
    pub counts: BatchCounts,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub dry_run: bool,
}

/// Wire envelope: `status` is `error` only for request-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub details: Details,
}

impl Response {
    pub fn from_report(report: &BatchReport) -> Self {
        let moved = if report.dry_run {
            &report.previewed
        } else {
            &report.applied
        };
        let details = Details {
            messages: report.messages.clone(),
            moved_files_details: moved
                .iter()
                .map(|m| MovedFileDetail {
                    file: m.source.display().to_string(),
                    destination_folder: m
                        .destination
                        .parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    moved_to_file: display_name(&m.destination),
                })
                .collect(),
            skipped_files_details: report
                .skipped
                .iter()
                .map(|s| SkippedFileDetail {
                    file: s.source.display().to_string(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            error_details: report
                .failed
                .iter()
                .map(|f| ErrorDetail {
                    file: f.source.display().to_string(),
                    error: f.error.clone(),
                })
                .collect(),
            counts: report.counts(),
            cancelled: report.cancelled,
            dry_run: report.dry_run,
        };
        Response {
            status: Status::Success,
            message: report.summary(),
            error_kind: None,
            details,
        }
    }

    pub fn from_error(err: &EngineError) -> Self {
        Response {
            status: Status::Error,
            message: err.to_string(),
            error_kind: Some(err.kind().to_string()),
            details: Details {
                messages: vec![format!("[ERROR] {err}")],
                ..Default::default()
            },
        }
    }
}
