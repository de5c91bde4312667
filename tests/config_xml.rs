use std::fs;

use serial_test::serial;
use tempfile::tempdir;

use namesmith::config::{CONFIG_ENV, LogLevel, config_path, load_config, load_config_from_xml_path};

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        unsafe {
            std::env::set_var(CONFIG_ENV, value);
        }
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(CONFIG_ENV);
        }
    }
}

#[test]
#[serial]
fn env_override_is_read() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    fs::write(
        &cfg_path,
        r#"<config>
  <log_level>debug</log_level>
  <dry_run>true</dry_run>
  <include_hidden>true</include_hidden>
  <extensions>pdf, epub</extensions>
  <exclude>Thumbs.db</exclude>
</config>"#,
    )
    .unwrap();
    let _env = EnvGuard::set(&cfg_path);

    assert_eq!(config_path(), Some(cfg_path.clone()));
    let (cfg, used) = load_config().unwrap();
    assert_eq!(used, Some(cfg_path));
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert!(cfg.dry_run);
    assert!(cfg.include_hidden);
    assert_eq!(cfg.extensions, ["pdf", "epub"]);
    assert_eq!(cfg.exclude_names, ["Thumbs.db"]);
}

#[test]
#[serial]
fn explicit_config_that_is_missing_is_an_error() {
    let td = tempdir().unwrap();
    let _env = EnvGuard::set(&td.path().join("nope.xml"));
    let err = load_config().unwrap_err();
    assert!(err.to_string().contains(CONFIG_ENV), "{err}");
}

#[test]
fn missing_elements_fall_back_to_defaults() {
    let td = tempdir().unwrap();
    let p = td.path().join("c.xml");
    fs::write(&p, "<config><dry_run>true</dry_run></config>").unwrap();
    let cfg = load_config_from_xml_path(&p).unwrap();
    assert!(cfg.dry_run);
    assert_eq!(cfg.log_level, LogLevel::Normal);
    assert!(cfg.extensions.is_empty());
    assert!(cfg.log_file.is_none());
}

#[test]
fn whitespace_only_log_file_means_none() {
    let td = tempdir().unwrap();
    let p = td.path().join("c.xml");
    fs::write(&p, "<config><log_file>   </log_file></config>").unwrap();
    let cfg = load_config_from_xml_path(&p).unwrap();
    assert!(cfg.log_file.is_none());
}

#[test]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let p = td.path().join("c.xml");
    fs::write(&p, "<config><dry_run>true</config>").unwrap();
    assert!(load_config_from_xml_path(&p).is_err());
}

#[cfg(unix)]
#[test]
fn log_file_behind_symlink_fails_validation() {
    let td = tempdir().unwrap();
    let base = td.path().canonicalize().unwrap();
    let real = base.join("real");
    fs::create_dir(&real).unwrap();
    let link = base.join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let cfg = namesmith::Config {
        log_file: Some(link.join("ns.log")),
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}
