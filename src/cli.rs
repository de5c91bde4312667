//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Global flags may appear before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.
//! - `request <FILE>` runs a JSON request document instead of a subcommand.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::{Config, LogLevel, parse_extension_list};
use crate::errors::EngineError;
use crate::fs_ops::Scope;
use crate::request::{Job, Request, TransformParams};

/// Collision-safe batch renaming and flattening.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Collision-safe batch renaming and folder flattening")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Which entries a rename applies to. Ignored by flatten.
    #[arg(long, global = true, value_enum, help = "Entries to rename: files, folders or both")]
    pub scope: Option<Scope>,

    /// Plan and report, but do not modify anything.
    #[arg(long, global = true, help = "Show what would be done, but do not rename or move anything")]
    pub dry_run: bool,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print the full response envelope as JSON on stdout.
    #[arg(long, global = true, help = "Print the result as a JSON response on stdout")]
    pub json_report: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Write logs to this file as well as the console.
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Treat dot-entries as ordinary entries.
    #[arg(long, global = true, help = "Include hidden (dot) files and folders")]
    pub hidden: bool,

    /// Only files with these extensions take part, e.g. "pdf,txt".
    #[arg(long, global = true, value_name = "EXTS", help = "Only touch files with these extensions (comma or space separated)")]
    pub ext: Option<String>,

    /// A base name that is never touched. Repeatable.
    #[arg(long, global = true, value_name = "NAME", help = "Never touch entries with this exact name (repeatable)")]
    pub exclude: Vec<String>,

    /// Hold an advisory lock file inside the root while running.
    #[arg(long, global = true, help = "Take an advisory lock on the root for the duration of the run")]
    pub lock: bool,

    /// Print where namesmith will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by namesmith and exit")]
    pub print_config: bool,

    /// Write a commented template config at the config location, then exit.
    #[arg(long, help = "Create a template config file and exit")]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Prepend a prefix to every name
    AddPrefix {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        prefix: String,
    },
    /// Insert a suffix before the extension
    AddSuffix {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        suffix: String,
    },
    /// Delete every match of a regular expression from names
    DeleteMatches {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
        pattern: String,
    },
    /// Keep only the digit runs of each name
    ExtractNumeric {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
    },
    /// Prefix each name with its ordering letter, e.g. "B-Book.pdf"
    InitialPrefix {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
    },
    /// Remove a leading ordering-letter prefix
    StripPrefix {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
    },
    /// Move every file below the root into the root and prune empty folders
    Flatten {
        #[arg(value_hint = ValueHint::DirPath)]
        root: PathBuf,
    },
    /// Run a JSON request document
    Request {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.hidden {
            cfg.include_hidden = true;
        }
        if let Some(ext) = &self.ext {
            cfg.extensions = parse_extension_list(ext);
        }
        for name in &self.exclude {
            let name = name.trim();
            if !name.is_empty() && !cfg.exclude_names.iter().any(|n| n == name) {
                cfg.exclude_names.push(name.to_string());
            }
        }
    }

    /// Build the job this invocation asks for. `None` when no subcommand was given.
    ///
    /// `--scope` overrides the scope inside a request document.
    pub fn to_job(&self) -> Result<Option<Job>, EngineError> {
        let Some(cmd) = &self.command else {
            return Ok(None);
        };
        let (root, params) = match cmd {
            Command::AddPrefix { root, prefix } => (root, TransformParams::AddPrefix { prefix: prefix.clone() }),
            Command::AddSuffix { root, suffix } => (root, TransformParams::AddSuffix { suffix: suffix.clone() }),
            Command::DeleteMatches { root, pattern } => (
                root,
                TransformParams::DeleteMatches {
                    pattern: pattern.clone(),
                },
            ),
            Command::ExtractNumeric { root } => (root, TransformParams::ExtractNumeric),
            Command::InitialPrefix { root } => (root, TransformParams::InitialPrefix),
            Command::StripPrefix { root } => (root, TransformParams::StripPrefix),
            Command::Flatten { root } => (root, TransformParams::Flatten),
            Command::Request { file } => {
                let text = fs::read_to_string(file).map_err(|e| {
                    EngineError::params("request", format!("cannot read {}: {e}", file.display()))
                })?;
                let mut job = Request::from_json(&text)?.into_job()?;
                if let Some(scope) = self.scope {
                    job.scope = scope;
                }
                return Ok(Some(job));
            }
        };
        params.validate()?;
        Ok(Some(Job {
            root: root.clone(),
            scope: self.scope.unwrap_or_default(),
            params,
        }))
    }
}

pub fn parse() -> Args {
    Args::parse()
}
