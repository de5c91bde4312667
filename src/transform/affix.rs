//! Prefix and suffix insertion.

use super::{TransformOutcome, split_extension};
use crate::fs_ops::EntryKind;
use crate::report::SkipReason;

/// `prefix + name`, unless the name already starts with the prefix.
pub fn add_prefix(name: &str, prefix: &str) -> TransformOutcome {
    if name.starts_with(prefix) {
        return TransformOutcome::Unchanged(SkipReason::AlreadyPrefixed);
    }
    TransformOutcome::Rename(format!("{prefix}{name}"))
}

/// Insert `suffix` before the extension for files; append for directories.
pub fn add_suffix(name: &str, kind: EntryKind, suffix: &str) -> TransformOutcome {
    match kind {
        EntryKind::Directory => {
            if name.ends_with(suffix) {
                TransformOutcome::Unchanged(SkipReason::AlreadySuffixed)
            } else {
                TransformOutcome::Rename(format!("{name}{suffix}"))
            }
        }
        EntryKind::File => {
            let (stem, ext) = split_extension(name);
            if stem.ends_with(suffix) {
                return TransformOutcome::Unchanged(SkipReason::AlreadySuffixed);
            }
            TransformOutcome::Rename(collapse_duplicate_extension(&format!("{stem}{suffix}{ext}")))
        }
    }
}

/// "book.txt.txt" -> "book.txt". Only repeated copies of the final extension
/// are removed.
pub fn collapse_duplicate_extension(name: &str) -> String {
    let (mut stem, ext) = split_extension(name);
    if ext.len() <= 1 {
        return name.to_string();
    }
    while stem.len() > ext.len() && stem.ends_with(ext) {
        stem = &stem[..stem.len() - ext.len()];
    }
    format!("{stem}{ext}")
}
