//! Tracing setup for the binary.
//!
//! Console events go to stderr (stdout carries results and `--json-report`).
//! A log file, when configured, gets a second non-blocking layer without ANSI
//! colors. `LogLevel` alone decides verbosity; RUST_LOG is not consulted.

use std::fmt as stdfmt;
use std::io;
use std::path::Path;

use anyhow::{Result, bail};
use chrono::Local;
use namesmith::output as out;
use namesmith::platform::open_log_file_secure_append;
use namesmith::{LogLevel, default_log_path, path_has_symlink_ancestor};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;

impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn level_filter(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

/// Open `path` for appending behind a non-blocking writer.
fn open_log_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    if path_has_symlink_ancestor(path)? {
        bail!("a parent of {} is a symlink", path.display());
    }
    let file = open_log_file_secure_append(path)?;
    Ok(tracing_appender::non_blocking(file))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file layer on drop and must outlive the run.
/// File logging problems are reported and the run continues on stderr only.
pub fn init_tracing(lvl: LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(io::stderr, json, true)];
    let mut guard = None;

    if let Some(path) = log_file {
        match open_log_writer(path) {
            Ok((writer, g)) => {
                layers.push(fmt_layer(writer, json, false));
                guard = Some(g);
            }
            Err(e) => {
                out::print_warn(&format!(
                    "File logging to '{}' is off ({e:#}); logs go to stderr only.",
                    path.display()
                ));
                if let Some(def) = default_log_path() {
                    out::print_warn(&format!("The default log path is {}", def.display()));
                }
            }
        }
    }

    let filter = EnvFilter::default().add_directive(level_filter(lvl).into());
    registry().with(layers).with(filter).try_init()?;
    Ok(guard)
}
