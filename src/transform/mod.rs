//! Pure name transforms.
//!
//! A transform maps an entry's current base name (plus its kind and its index in
//! scanner order) to either a new candidate name or `Unchanged` with a reason.
//! Transforms never look at the filesystem; collisions are the resolver's job.

mod affix;
mod initial;
mod numeric;
mod pattern;
pub mod transliterate;

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::errors::EngineError;
use crate::fs_ops::EntryKind;
use crate::report::SkipReason;

pub use affix::{add_prefix, add_suffix, collapse_duplicate_extension};
pub use initial::{initial_prefix, ordering_key, strip_initial_prefix};
pub use numeric::extract_numeric;
pub use pattern::delete_matches;
pub use transliterate::{OrderingTable, PinyinTable};

/// Result of applying a transform to one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Rename(String),
    Unchanged(SkipReason),
}

/// Anything that can propose a new name for an entry.
///
/// `index` is the entry's position in scanner order, so callers can plug in
/// numbering schemes without touching the planner.
pub trait NameTransform {
    fn transform(&self, name: &str, kind: EntryKind, index: usize) -> TransformOutcome;
}

impl<F> NameTransform for F
where
    F: Fn(&str, EntryKind, usize) -> TransformOutcome,
{
    fn transform(&self, name: &str, kind: EntryKind, index: usize) -> TransformOutcome {
        self(name, kind, index)
    }
}

/// Built-in transforms.
#[derive(Clone)]
pub enum Transform {
    AddPrefix(String),
    AddSuffix(String),
    DeleteMatches(Regex),
    ExtractNumeric,
    InitialPrefix(Arc<dyn OrderingTable>),
    StripPrefix,
}

impl Transform {
    /// Compile a deletion pattern. Fails before any scanning happens.
    pub fn delete_matches(pattern: &str) -> Result<Self, EngineError> {
        Regex::new(pattern)
            .map(Transform::DeleteMatches)
            .map_err(|e| EngineError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Initial-letter prefixing with the bundled transliteration table.
    pub fn initial_prefix() -> Self {
        Transform::InitialPrefix(Arc::new(PinyinTable))
    }

    /// Short label used in log lines and report summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Transform::AddPrefix(_) => "add_prefix",
            Transform::AddSuffix(_) => "add_suffix",
            Transform::DeleteMatches(_) => "delete_matches",
            Transform::ExtractNumeric => "extract_numeric",
            Transform::InitialPrefix(_) => "initial_prefix",
            Transform::StripPrefix => "strip_prefix",
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::AddPrefix(p) => f.debug_tuple("AddPrefix").field(p).finish(),
            Transform::AddSuffix(s) => f.debug_tuple("AddSuffix").field(s).finish(),
            Transform::DeleteMatches(re) => f.debug_tuple("DeleteMatches").field(&re.as_str()).finish(),
            Transform::ExtractNumeric => f.write_str("ExtractNumeric"),
            Transform::InitialPrefix(table) => f.debug_tuple("InitialPrefix").field(table).finish(),
            Transform::StripPrefix => f.write_str("StripPrefix"),
        }
    }
}

impl NameTransform for Transform {
    fn transform(&self, name: &str, kind: EntryKind, _index: usize) -> TransformOutcome {
        match self {
            Transform::AddPrefix(p) => add_prefix(name, p),
            Transform::AddSuffix(s) => add_suffix(name, kind, s),
            Transform::DeleteMatches(re) => delete_matches(re, name),
            Transform::ExtractNumeric => extract_numeric(name, kind),
            Transform::InitialPrefix(table) => initial_prefix(name, table.as_ref()),
            Transform::StripPrefix => strip_initial_prefix(name),
        }
    }
}

/// Split a file name into stem and extension (extension keeps its dot).
///
/// Follows `Path::extension` rules: the last dot splits, unless it is the
/// first character (".env" has no extension).
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
