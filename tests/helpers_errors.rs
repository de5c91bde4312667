use std::io;
use std::path::Path;

use namesmith::fs_ops::{describe_io_error, io_error_with_help};

#[test]
fn notfound_fallback_hint_includes_path() {
    let p = Path::new("/nonexistent/path/for/test");
    let f = io_error_with_help("rename", p);
    let err = f(io::Error::from(io::ErrorKind::NotFound));
    let msg = format!("{}", err);
    assert!(msg.contains("rename"));
    assert!(msg.contains(p.to_string_lossy().as_ref()));
    assert!(msg.contains("path not found"), "msg was: {msg}");
}

#[cfg(unix)]
#[test]
fn permission_hint_and_os_code_present() {
    let p = Path::new("/tmp/x");
    let msg = describe_io_error("rename", p, &io::Error::from_raw_os_error(libc::EACCES));
    assert!(msg.contains("permission denied"), "msg was: {msg}");
    assert!(msg.contains("os code"), "should include os code in message");
}

#[cfg(unix)]
#[test]
fn existing_destination_hint_says_nothing_was_overwritten() {
    let p = Path::new("/tmp/x");
    let msg = describe_io_error("rename", p, &io::Error::from_raw_os_error(libc::EEXIST));
    assert!(msg.contains("nothing was overwritten"), "msg was: {msg}");
}

#[cfg(unix)]
#[test]
fn read_only_and_name_length_hints() {
    let p = Path::new("/tmp");
    let erofs = describe_io_error("op", p, &io::Error::from_raw_os_error(libc::EROFS));
    let toolong = describe_io_error("op", p, &io::Error::from_raw_os_error(libc::ENAMETOOLONG));
    assert!(erofs.contains("read-only filesystem"));
    assert!(toolong.contains("too long"));
}

#[test]
fn unknown_errors_keep_the_base_message() {
    let p = Path::new("/tmp");
    let msg = describe_io_error("op", p, &io::Error::other("weird"));
    assert!(msg.starts_with("op '/tmp': weird"), "msg was: {msg}");
}
