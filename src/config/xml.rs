//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request.
//!
//! Unknown elements are a hard error so typos surface instead of being ignored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use tracing::{debug, info};

use super::paths::{config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel, parse_extension_list};
use crate::platform::write_config_secure_new_0600;

/// Mirror of the XML document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config", deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    dry_run: Option<bool>,
    include_hidden: Option<bool>,
    /// Whitespace- or comma-separated list.
    extensions: Option<String>,
    #[serde(default, rename = "exclude")]
    exclude: Vec<String>,
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(s) = parsed.log_level.as_deref() {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = parsed.log_file.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.log_file = Some(PathBuf::from(trimmed));
        }
    }
    cfg.dry_run = parsed.dry_run.unwrap_or(false);
    cfg.include_hidden = parsed.include_hidden.unwrap_or(false);
    cfg.extensions = parsed
        .extensions
        .as_deref()
        .map(parse_extension_list)
        .unwrap_or_default();
    cfg.exclude_names = parsed
        .exclude
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    Ok(cfg)
}

/// Load a Config from a specific XML file.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    if contents.trim().is_empty() {
        debug!(path = %path.display(), "Config file is empty; using defaults");
        return Ok(Config::default());
    }
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Load the effective config file, if any.
///
/// Returns defaults when no file exists at the resolved location. An explicit
/// `$NAMESMITH_CONFIG` that points nowhere is an error.
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let explicit = std::env::var_os(super::paths::CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let Some(path) = config_path() else {
        return Ok((Config::default(), None));
    };
    if !path.exists() {
        if explicit {
            bail!("config file named by {} does not exist: {}", super::paths::CONFIG_ENV, path.display());
        }
        return Ok((Config::default(), None));
    }
    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "Loaded config");
    Ok((cfg, Some(path)))
}

/// Write a commented template config at `path`. Refuses to overwrite.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/namesmith.log".into());

    let content = format!(
        "<!--\n  namesmith configuration (XML). CLI flags override these values.\n\n    log_level       -> quiet | normal | info | debug\n    log_file        -> optional log file; leave empty to log to the console only\n    dry_run         -> true to plan and report without moving anything\n    include_hidden  -> true to treat dot-files and dot-folders as ordinary entries\n    extensions      -> only rename files with these extensions, e.g. \"pdf txt epub\"\n    exclude         -> a base name that is never touched; repeat for more\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <!-- <log_file>{suggested_log}</log_file> -->\n  <dry_run>false</dry_run>\n  <include_hidden>false</include_hidden>\n  <extensions></extensions>\n  <exclude>Thumbs.db</exclude>\n  <exclude>desktop.ini</exclude>\n</config>\n"
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}
