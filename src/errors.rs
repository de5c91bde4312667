//! Typed error definitions for namesmith.
//! Request-level failures only: anything that stops a run before the first
//! filesystem mutation. Per-item failures never surface here; they are
//! captured in the batch report.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Root path not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Failed to scan {path}: {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid parameters for {kind}: {reason}")]
    InvalidParams { kind: String, reason: String },

    #[error("Operation interrupted before any item was processed")]
    Interrupted,
}

impl EngineError {
    /// Stable numeric code for logs and scripted callers.
    pub fn code(&self) -> i32 {
        match self {
            EngineError::RootNotFound(_) => 10,
            EngineError::RootNotDirectory(_) => 11,
            EngineError::Scan { .. } => 12,
            EngineError::InvalidPattern { .. } => 20,
            EngineError::InvalidParams { .. } => 21,
            EngineError::Interrupted => 30,
        }
    }

    /// Short machine-readable tag, used as the `kind` field in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::RootNotFound(_) => "root_not_found",
            EngineError::RootNotDirectory(_) => "root_not_directory",
            EngineError::Scan { .. } => "scan_failed",
            EngineError::InvalidPattern { .. } => "invalid_pattern",
            EngineError::InvalidParams { .. } => "invalid_params",
            EngineError::Interrupted => "interrupted",
        }
    }

    pub(crate) fn params(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidParams {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}
