//! Diagnostics for the `devis` binary.
//!
//! Events go to stderr so stdout carries nothing but the breakdown (or the
//! JSON quote). `--log-file` adds a second, uncoloured copy of every event.
//! One reloadable [`EnvFilter`] gates both outputs; it starts from `RUST_LOG`
//! and falls back to `info`.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use chrono::Local;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::ParseError,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("logging is not initialized")]
    NotInitialized,

    #[error("invalid log filter '{directive}'")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot apply log filter")]
    Reload(#[from] reload::Error),

    #[error("cannot open log file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ─── event format ────────────────────────────────────────────────────────────

/// `2026-03-14 09:26:53.589  INFO devis_pdf::document: message key=value`
///
/// The target is printed instead of a source location: the three crates all
/// have a `lib.rs`, so a bare file name does not say where an event came from.
struct EventFormat;

impl EventFormat {
    fn level_color(level: Level) -> &'static str {
        match level {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[32m",
            Level::DEBUG => "\x1b[34m",
            Level::TRACE => "\x1b[35m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for EventFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let level = *meta.level();

        if writer.has_ansi_escapes() {
            write!(
                writer,
                "\x1b[2m{timestamp}\x1b[0m {}{level:>5}\x1b[0m \x1b[2m{}:\x1b[0m ",
                Self::level_color(level),
                meta.target()
            )?;
        } else {
            write!(writer, "{timestamp} {level:>5} {}: ", meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// ─── log file ────────────────────────────────────────────────────────────────

/// Destination of `--log-file`. Events are dropped until a file is attached.
#[derive(Clone, Default)]
struct LogFile(Arc<Mutex<Option<File>>>);

impl LogFile {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn attach(
        &self,
        file: File,
    ) {
        *self.lock() = Some(file);
    }
}

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.lock())
    }
}

// ─── global handles ──────────────────────────────────────────────────────────

static FILTER: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();
static LOG_FILE: OnceLock<LogFile> = OnceLock::new();

fn initial_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_default_logging() {
    let log_file = LogFile::default();
    let (filter, handle) = reload::Layer::new(initial_filter());

    let console = tracing_subscriber::fmt::layer()
        .event_format(EventFormat)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file = tracing_subscriber::fmt::layer()
        .event_format(EventFormat)
        .with_ansi(false)
        .with_writer(log_file.clone());

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();

    if installed.is_ok() {
        let _ = FILTER.set(handle);
        let _ = LOG_FILE.set(log_file);
    }
}

/// Replaces the active filter, e.g. `debug` or `devis_core=trace,info`.
pub fn set_log_level(directive: &str) -> Result<(), LoggingError> {
    let handle = FILTER.get().ok_or(LoggingError::NotInitialized)?;
    let filter = EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        source,
    })?;
    handle.reload(filter)?;
    Ok(())
}

/// Appends every event to `path` from now on, replacing any previous file.
pub fn enable_file_logging(path: &Path) -> Result<(), LoggingError> {
    let log_file = LOG_FILE.get().ok_or(LoggingError::NotInitialized)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;

    log_file.attach(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(emit: impl FnOnce()) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devis.log");
        let log_file = LogFile::default();
        log_file.attach(File::create(&path).unwrap());

        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(EventFormat)
            .with_writer(log_file)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);

        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn plain_line_has_level_target_and_fields() {
        let text = render(|| tracing::warn!(months = 30, "installment months clamped"));

        assert_eq!(text.lines().count(), 1);
        assert!(text.contains(" WARN devis_cli::logging::tests: installment months clamped months=30"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn detached_log_file_discards_events() {
        let log_file = LogFile::default();
        let mut writer = log_file.make_writer();

        assert_eq!(writer.write(b"dropped").unwrap(), 7);
        assert!(writer.flush().is_ok());
    }

    #[test]
    fn setters_fail_before_initialization() {
        // The global subscriber is never installed in unit tests.
        assert!(matches!(set_log_level("debug"), Err(LoggingError::NotInitialized)));
    }
}
