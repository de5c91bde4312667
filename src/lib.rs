//! Core library for `namesmith`.
//!
//! Batch renaming and flattening for a single directory tree. A run scans the
//! root, builds a complete plan with collision-free destinations, then applies
//! it one item at a time, recording every outcome in a `BatchReport`.
//!
//! Layout:
//! - `transform`: pure name transforms (prefix, suffix, pattern delete, ...)
//! - `fs_ops`: scanning, collision resolution, planning, execution, pruning
//! - `engine`: one invocation end to end
//! - `request`: the JSON request shape and typed transform parameters
//! - `report`: per-run results and the response envelope
//! - `config`: explicit settings plus optional XML config file
//! - `cli` / `output`: the command-line front end

pub mod cancel;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod report;
pub mod request;
pub mod transform;

pub use cancel::CancelToken;
pub use config::{Config, LogLevel, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use engine::{plan, respond, run, run_with};
pub use errors::EngineError;
pub use fs_ops::{EntryKind, Scope};
pub use report::{BatchCounts, BatchReport, Response, SkipReason, Status};
pub use request::{Job, Operation, Request, TransformKind, TransformParams};
pub use transform::{NameTransform, Transform, TransformOutcome};
