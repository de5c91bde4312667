//! Destination reservation and collision naming.
//!
//! Policy:
//! - A candidate is free when no earlier item in this plan claimed it and
//!   nothing exists at that path on disk, unless the thing on disk is the very
//!   source being renamed (a case-only rename on a case-insensitive volume).
//! - Otherwise "(n)" is inserted before the extension, n = 1, 2, ..., until a
//!   free slot is found. Directories get the marker at the end of the name.
//!
//! Claims compare names after NFC normalization, and also case-insensitively
//! on targets whose default volumes ignore case (macOS, Windows).
//!
//! Resolution only probes the filesystem; it never creates anything.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use super::scan::EntryKind;
use crate::transform::split_extension;

const FOLD_CASE_BY_DEFAULT: bool = cfg!(any(target_os = "macos", windows));

/// Destinations already promised to an earlier item in the same plan.
#[derive(Debug, Clone)]
pub struct ClaimSet {
    claimed: HashSet<PathBuf>,
    fold_case: bool,
}

impl Default for ClaimSet {
    fn default() -> Self {
        Self::with_case_folding(FOLD_CASE_BY_DEFAULT)
    }
}

impl ClaimSet {
    /// Claim set using the target's usual case sensitivity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim set that treats `Report.pdf` and `report.pdf` as one name when
    /// `fold_case` is set.
    pub fn with_case_folding(fold_case: bool) -> Self {
        Self {
            claimed: HashSet::new(),
            fold_case,
        }
    }

    pub fn folds_case(&self) -> bool {
        self.fold_case
    }

    /// Returns false if the path (or a spelling that folds to it) was already claimed.
    pub fn claim(&mut self, path: impl Into<PathBuf>) -> bool {
        let key = self.key(&path.into());
        self.claimed.insert(key)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.claimed.contains(&self.key(path))
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    fn key(&self, path: &Path) -> PathBuf {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => path.with_file_name(fold_name(name, self.fold_case)),
            None => path.to_path_buf(),
        }
    }
}

impl<P: Into<PathBuf>> Extend<P> for ClaimSet {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for path in iter {
            self.claim(path);
        }
    }
}

/// NFC form of `name`, lower-cased when `fold_case` is set.
pub fn fold_name(name: &str, fold_case: bool) -> String {
    let nfc: String = name.nfc().collect();
    if fold_case { nfc.to_lowercase() } else { nfc }
}

/// Pick the final destination for `name` inside `dir` and claim it.
///
/// `source` is the entry being moved; a path occupied only by that same
/// entry counts as free.
pub fn resolve(
    dir: &Path,
    name: &str,
    kind: EntryKind,
    source: &Path,
    claims: &mut ClaimSet,
) -> PathBuf {
    let (stem, ext) = split_for_kind(name, kind);
    let first = dir.join(build_name_with_suffix(stem, ext, ""));
    if is_free(&first, source, claims) {
        claims.claim(first.clone());
        return first;
    }

    let mut n: u64 = 1;
    loop {
        let candidate = dir.join(build_name_with_suffix(stem, ext, &format!("({n})")));
        if is_free(&candidate, source, claims) {
            trace!(name, attempts = n, chosen = %candidate.display(), "Resolved collision");
            claims.claim(candidate.clone());
            return candidate;
        }
        n = n.saturating_add(1);
    }
}

/// True if `path` exists on disk (without following a final symlink).
pub fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// True if `a` and `b` are one directory entry spelled two ways.
///
/// Both paths must share a parent and their names must match once case and
/// Unicode normalization are folded. On Unix they must also resolve to the same
/// inode with a single link, so a hard link under another name is a different
/// entry.
pub fn is_same_entry(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    if a.parent() != b.parent() {
        return false;
    }
    let (Some(na), Some(nb)) = (
        a.file_name().and_then(|n| n.to_str()),
        b.file_name().and_then(|n| n.to_str()),
    ) else {
        return false;
    };
    if fold_name(na, true) != fold_name(nb, true) {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
            (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino() && ma.nlink() == 1,
            _ => false,
        }
    }
    #[cfg(not(unix))]
    {
        occupied(a) && occupied(b)
    }
}

fn is_free(candidate: &Path, source: &Path, claims: &ClaimSet) -> bool {
    if claims.contains(candidate) {
        return false;
    }
    !occupied(candidate) || is_same_entry(candidate, source)
}

fn split_for_kind(name: &str, kind: EntryKind) -> (&str, &str) {
    match kind {
        EntryKind::File => split_extension(name),
        EntryKind::Directory => (name, ""),
    }
}

#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240;
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

/// `stem + suffix + ext`, truncating the stem on a char boundary so the
/// result fits in MAX_FILENAME_LEN bytes.
fn build_name_with_suffix(stem: &str, ext: &str, suffix: &str) -> String {
    let overhead = suffix.len() + ext.len();
    let mut stem = stem;
    if stem.len() + overhead > MAX_FILENAME_LEN {
        let budget = MAX_FILENAME_LEN.saturating_sub(overhead);
        let mut cut = budget.min(stem.len());
        while cut > 0 && !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        stem = &stem[..cut];
    }
    if stem.is_empty() {
        stem = "f";
    }
    format!("{stem}{suffix}{ext}")
}
