use std::backtrace::Backtrace;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use log::{Level, LevelFilter};

pub use crate::console::ConsoleStyle;
pub use crate::error::LoggerError;
pub use crate::record::LogRecord;
use crate::config::Config;
use crate::console::ConsoleSink;
use crate::format::file_line;
use crate::levels::filter_from_usize;
use crate::rotate::FileSink;

const WRITE_CHECK_NAME: &str = ".plog-write-check";

/// The outputs attached to a [`Logger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File,
}

/// Handle to a console sink and a daily rolling file sink.
///
/// `Logger` is cheap to clone and can be passed to whoever needs to log.
/// Both sinks are written on the caller's thread, each behind its own lock,
/// so concurrent callers never interleave within a line and a record is on
/// disk once [`log`](Logger::log) returns.
///
/// [`init`](crate::init) builds one and registers it with the `log` facade;
/// [`Logger::build`] builds one without touching any process-wide state.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    level: AtomicUsize,
    console: ConsoleSink,
    file: FileSink,
}

impl Logger {
    /// Creates the log directory and opens today's log file.
    ///
    /// # Arguments
    ///
    /// * `config` - Options for both sinks.
    ///
    /// # Returns
    ///
    /// A `Logger` on success, or a `LoggerError` when the directory cannot be
    /// created or written to, or the log file cannot be opened.
    pub fn build(config: Config) -> Result<Logger, LoggerError> {
        let dir = config.log_dir.clone();
        fs::create_dir_all(&dir)
            .map_err(|source| LoggerError::CreateLogDir { path: dir.clone(), source })?;
        check_writable(&dir)?;

        let file = FileSink::open(&dir, &config.file_name, config.retention)?;
        let console = ConsoleSink::new(&config.console, config.color);

        Ok(Logger {
            inner: Arc::new(Inner {
                level: AtomicUsize::new(config.level as usize),
                config,
                console,
                file,
            }),
        })
    }

    /// Current threshold.
    pub fn level(&self) -> LevelFilter {
        filter_from_usize(self.inner.level.load(Ordering::Relaxed))
    }

    /// Changes the threshold of both sinks of this logger.
    ///
    /// Use [`plog::set_level`](crate::set_level) for the registered logger so
    /// the `log` facade follows too.
    pub fn set_level(&self, level: LevelFilter) {
        self.inner.level.store(level as usize, Ordering::Relaxed);
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level()
    }

    /// Sends `record` to both sinks if its level passes the threshold.
    pub fn log(&self, record: LogRecord) {
        if self.enabled(record.level) {
            self.emit(&record);
        }
    }

    fn emit(&self, record: &LogRecord) {
        self.inner.console.emit(record);
        self.inner.file.write_line(&file_line(self.inner.config.file_format, record));
    }

    /// Records a panic at error severity with its location and a backtrace.
    ///
    /// The threshold is ignored: a panic is always written.
    ///
    /// # Arguments
    ///
    /// * `info` - What the panic hook received.
    pub fn record_panic(&self, info: &PanicHookInfo<'_>) {
        let payload = match info.payload().downcast_ref::<&str>() {
            Some(s) => s.to_string(),
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => s.clone(),
                None => "Box<dyn Any>".to_string(),
            },
        };

        let current = thread::current();
        let thread_name = current.name().unwrap_or("<unnamed>");

        let record = match info.location() {
            Some(location) => LogRecord::new(
                Level::Error,
                "panic",
                format!("thread '{thread_name}' panicked at {location}: {payload}"),
            )
            .with_location(location.file(), location.line()),
            None => LogRecord::new(
                Level::Error,
                "panic",
                format!("thread '{thread_name}' panicked: {payload}"),
            ),
        };

        self.emit(&record.with_backtrace(format!("stack backtrace:\n{}", Backtrace::force_capture())));
        self.flush();
    }

    /// Logs `error` and its chain of sources at error severity.
    pub fn report(&self, error: &(dyn std::error::Error + 'static)) {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str("\n  caused by: ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        self.log(LogRecord::new(Level::Error, "error", message));
    }

    /// Flushes both sinks.
    pub fn flush(&self) {
        self.inner.console.flush();
        self.inner.file.flush();
    }

    /// Always one console sink and one file sink.
    pub fn sinks(&self) -> [SinkKind; 2] {
        [SinkKind::Console, SinkKind::File]
    }

    pub fn console_style(&self) -> ConsoleStyle {
        self.inner.console.style()
    }

    /// Path of the file written today.
    pub fn file_path(&self) -> PathBuf {
        self.inner.file.current_path()
    }

    /// Today's file and the rotated files still kept, oldest first.
    pub fn log_files(&self) -> Vec<PathBuf> {
        self.inner.file.files()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("console_style", &self.console_style())
            .field("log_dir", &self.inner.config.log_dir)
            .field("file_name", &self.inner.config.file_name)
            .finish()
    }
}

fn check_writable(dir: &Path) -> Result<(), LoggerError> {
    let marker = dir.join(WRITE_CHECK_NAME);
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&marker)
        .map_err(|source| LoggerError::LogDirNotWritable { path: dir.to_path_buf(), source })?;
    let _ = fs::remove_file(&marker);
    Ok(())
}
