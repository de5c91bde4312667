//! Root enumeration.
//!
//! Produces a deterministic, sorted list of entries for the planner. Entries
//! the engine must not touch (symlinks, special files, filtered names) are
//! returned as `Excluded` so nothing drops out of the report silently.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

use crate::errors::EngineError;
use crate::report::SkipReason;

/// Name of the advisory lock file a front end may create inside the root.
pub const LOCK_FILE_NAME: &str = ".namesmith.lock";
/// Prefix of the temp files used by the copy fallback.
pub(crate) const TEMP_PREFIX: &str = ".namesmith.";

/// Which direct children of the root take part in a rename run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Files,
    #[serde(alias = "directories")]
    #[value(alias = "dirs")]
    Folders,
    #[default]
    Both,
}

impl Scope {
    fn admits(self, kind: EntryKind) -> bool {
        matches!(
            (self, kind),
            (Scope::Both, _) | (Scope::Files, EntryKind::File) | (Scope::Folders, EntryKind::Directory)
        )
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Files => "files",
            Scope::Folders => "folders",
            Scope::Both => "both",
        })
    }
}

impl FromStr for Scope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "files" | "file" => Ok(Scope::Files),
            "folders" | "folder" | "dirs" | "directories" => Ok(Scope::Folders),
            "both" | "all" => Ok(Scope::Both),
            _ => Err(format!("invalid scope: '{s}' (expected files, folders or both)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One filesystem object under the root, as seen at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// NFC-normalized base name.
    pub name: String,
}

/// An object the scanner saw but will not hand to a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excluded {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub include_hidden: bool,
    /// Lower-case extensions without the dot. Empty means "all files".
    pub extensions: Vec<String>,
    /// Exact base names to leave alone.
    pub exclude_names: Vec<String>,
}

impl ScanOptions {
    fn wants_extension(&self, name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub entries: Vec<Entry>,
    pub excluded: Vec<Excluded>,
    /// Every visited directory below the root (tree scans only), in walk order.
    pub subdirs: Vec<PathBuf>,
}

/// Check that `root` exists and is a directory; returns its canonical form.
pub fn ensure_root(root: &Path) -> Result<PathBuf, EngineError> {
    let meta = fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EngineError::RootNotFound(root.to_path_buf()),
        _ => EngineError::Scan {
            path: root.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    if !meta.is_dir() {
        return Err(EngineError::RootNotDirectory(root.to_path_buf()));
    }
    dunce::canonicalize(root).map_err(|e| EngineError::Scan {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Direct children of `root` matching `scope`, sorted by name.
pub fn scan_root(root: &Path, scope: Scope, opts: &ScanOptions) -> Result<ScanResult, EngineError> {
    let scan_err = |e: std::io::Error| EngineError::Scan {
        path: root.to_path_buf(),
        reason: e.to_string(),
    };
    let mut result = ScanResult::default();

    for dirent in fs::read_dir(root).map_err(scan_err)? {
        let dirent = dirent.map_err(scan_err)?;
        let ft = dirent.file_type().map_err(scan_err)?;
        let path = dirent.path();
        let Some(raw) = dirent.file_name().to_str().map(str::to_owned) else {
            result.exclude(path, SkipReason::NonUtf8Name);
            continue;
        };
        if is_internal(&raw) || (is_hidden(&raw) && !opts.include_hidden) {
            continue;
        }
        let kind = if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else if ft.is_symlink() {
            result.exclude(path, SkipReason::Symlink);
            continue;
        } else {
            result.exclude(path, SkipReason::SpecialFile);
            continue;
        };
        if !scope.admits(kind) {
            continue;
        }
        if filtered(&raw, kind, opts) {
            result.exclude(path, SkipReason::Filtered);
            continue;
        }
        result.entries.push(Entry {
            path,
            kind,
            name: raw.nfc().collect(),
        });
    }

    result.sort();
    info!(
        root = %root.display(),
        scope = %scope,
        entries = result.entries.len(),
        excluded = result.excluded.len(),
        "Scanned root"
    );
    Ok(result)
}

/// Every file at any depth below `root`, plus the directories visited.
///
/// Symlinks are never followed. Hidden directories are not descended unless
/// `include_hidden` is set, and neither are excluded directory names.
pub fn scan_tree(root: &Path, opts: &ScanOptions) -> Result<ScanResult, EngineError> {
    let mut result = ScanResult::default();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() {
                return true;
            }
            match e.file_name().to_str() {
                Some(name) => {
                    (opts.include_hidden || !is_hidden(name))
                        && !opts.exclude_names.iter().any(|x| x == name)
                }
                None => false,
            }
        });

    for item in walker {
        let item = item.map_err(|e| EngineError::Scan {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            reason: e.to_string(),
        })?;
        let ft = item.file_type();
        let path = item.path().to_path_buf();
        if ft.is_dir() {
            result.subdirs.push(path);
            continue;
        }
        let Some(raw) = item.file_name().to_str().map(str::to_owned) else {
            result.exclude(path, SkipReason::NonUtf8Name);
            continue;
        };
        if is_internal(&raw) || (is_hidden(&raw) && !opts.include_hidden) {
            continue;
        }
        if ft.is_symlink() {
            result.exclude(path, SkipReason::Symlink);
            continue;
        }
        if !ft.is_file() {
            result.exclude(path, SkipReason::SpecialFile);
            continue;
        }
        if filtered(&raw, EntryKind::File, opts) {
            result.exclude(path, SkipReason::Filtered);
            continue;
        }
        result.entries.push(Entry {
            path,
            kind: EntryKind::File,
            name: raw.nfc().collect(),
        });
    }

    result.sort();
    info!(
        root = %root.display(),
        files = result.entries.len(),
        dirs = result.subdirs.len(),
        excluded = result.excluded.len(),
        "Scanned tree"
    );
    Ok(result)
}

impl ScanResult {
    fn exclude(&mut self, path: PathBuf, reason: SkipReason) {
        debug!(path = %path.display(), %reason, "Excluded from plan");
        self.excluded.push(Excluded { path, reason });
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        self.excluded.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Lock and temp files we create ourselves are never entries.
fn is_internal(name: &str) -> bool {
    name == LOCK_FILE_NAME || (name.starts_with(TEMP_PREFIX) && name.ends_with(".tmp"))
}

fn filtered(name: &str, kind: EntryKind, opts: &ScanOptions) -> bool {
    if opts.exclude_names.iter().any(|x| x == name) {
        return true;
    }
    kind == EntryKind::File && !opts.wants_extension(name)
}
