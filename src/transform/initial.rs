//! Initial-letter ordering prefixes ("Z-中文.txt", "A-apple") and their removal.

use super::{OrderingTable, TransformOutcome};
use crate::report::SkipReason;

/// Key used when no character of the name has an ordering letter.
pub const FALLBACK_KEY: char = '#';

/// Ordering key of a name: the table letter of its first mappable character.
///
/// Digits and punctuation are passed over, so "2024 notes" sorts under 'N'.
pub fn ordering_key(name: &str, table: &dyn OrderingTable) -> char {
    name.chars()
        .find_map(|c| table.ordering_letter(c))
        .unwrap_or(FALLBACK_KEY)
}

/// Produce "<KEY>-<name>".
///
/// A name that already carries the key its remainder would get is left alone,
/// so re-running over a prefixed directory is a no-op.
pub fn initial_prefix(name: &str, table: &dyn OrderingTable) -> TransformOutcome {
    if let Some((key, rest)) = split_key(name)
        && ordering_key(rest, table) == key
    {
        return TransformOutcome::Unchanged(SkipReason::AlreadyPrefixed);
    }
    let key = ordering_key(name, table);
    TransformOutcome::Rename(format!("{key}-{name}"))
}

/// Remove a leading "<KEY>-" token. Exact inverse of `initial_prefix`.
pub fn strip_initial_prefix(name: &str) -> TransformOutcome {
    match split_key(name) {
        Some((_, "")) => TransformOutcome::Unchanged(SkipReason::EmptyResult),
        Some((_, rest)) => TransformOutcome::Rename(rest.to_string()),
        None => TransformOutcome::Unchanged(SkipReason::NoMatch),
    }
}

/// "A-rest" -> Some(('A', "rest")). Keys are 'A'..='Z' or '#'.
fn split_key(name: &str) -> Option<(char, &str)> {
    let bytes = name.as_bytes();
    if bytes.len() < 2 || bytes[1] != b'-' {
        return None;
    }
    let key = bytes[0] as char;
    if key.is_ascii_uppercase() || key == FALLBACK_KEY {
        Some((key, &name[2..]))
    } else {
        None
    }
}
