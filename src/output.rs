use owo_colors::OwoColorize;

use crate::report::{BatchReport, Response, Status};

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix). Used for "old -> new" lines
/// which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Human rendering of a finished batch: one line per applied move, then
/// skipped/failed details, then the summary.
pub fn print_report(report: &BatchReport) {
    for m in report.applied.iter().chain(report.previewed.iter()) {
        print_user(&format!("{} -> {}", m.source.display(), m.destination.display()));
    }
    for s in &report.skipped {
        print_info(&format!("skipped {}: {}", s.source.display(), s.reason));
    }
    for f in &report.failed {
        print_error(&format!("{}: {}", f.source.display(), f.error));
    }
    for p in &report.prune_skipped {
        print_warn(&format!("kept directory {}: {}", p.path.display(), p.reason));
    }

    let c = report.counts();
    let summary = format!(
        "planned {}, applied {}, skipped {}, failed {}, pruned {}",
        c.planned, c.applied, c.skipped, c.failed, c.pruned_dirs
    );
    if report.dry_run {
        print_info(&format!("dry-run: {summary}"));
    } else if c.failed > 0 || report.cancelled {
        print_warn(&summary);
    } else {
        print_success(&summary);
    }
}

/// Print the JSON response envelope to stdout.
pub fn print_response_json(response: &Response) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(response)?;
    print_user(&text);
    if response.status == Status::Error {
        print_error(&response.message);
    }
    Ok(())
}
