//! Config validation.
//! The engine settings need no checks of their own; only the log file
//! location can be unsafe.

use anyhow::{Result, bail};
use tracing::debug;

use super::paths::path_has_symlink_ancestor;
use super::types::Config;

impl Config {
    /// Refuse a log file that is a directory or sits behind a symlink.
    pub fn validate(&self) -> Result<()> {
        if let Some(log) = &self.log_file {
            if log.is_dir() {
                bail!("log_file points to a directory: {}", log.display());
            }
            if path_has_symlink_ancestor(log)? {
                bail!("log_file has a symlinked ancestor: {}", log.display());
            }
        }
        debug!(
            level = %self.log_level,
            dry_run = self.dry_run,
            include_hidden = self.include_hidden,
            extensions = ?self.extensions,
            exclude = ?self.exclude_names,
            "Config validated"
        );
        Ok(())
    }
}
