//! Core configuration types.
//! - Config is the explicit settings value passed into every engine run.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::ScanOptions;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-item plan decisions
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime settings for one invocation. Nothing in the engine reads
/// process-wide defaults; everything it needs arrives through this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Plan and report, but move nothing
    pub dry_run: bool,
    /// Treat dot-entries as ordinary entries
    pub include_hidden: bool,
    /// Only files with these extensions take part (lower-case, no dot). Empty = all.
    pub extensions: Vec<String>,
    /// Base names that are never touched
    pub exclude_names: Vec<String>,
}

impl Config {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_hidden: self.include_hidden,
            extensions: self.extensions.clone(),
            exclude_names: self.exclude_names.clone(),
        }
    }
}

/// Split "pdf, .TXT epub" into ["pdf", "txt", "epub"].
pub fn parse_extension_list(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" none "), Some(LogLevel::Quiet));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn extension_lists_normalize() {
        assert_eq!(parse_extension_list("pdf, .TXT  epub"), ["pdf", "txt", "epub"]);
        assert!(parse_extension_list(" , ").is_empty());
    }

    #[test]
    fn scan_options_mirror_config() {
        let cfg = Config {
            include_hidden: true,
            extensions: vec!["pdf".into()],
            ..Default::default()
        };
        let opts = cfg.scan_options();
        assert!(opts.include_hidden);
        assert_eq!(opts.extensions, ["pdf"]);
    }
}
