use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::LevelFilter;

use crate::levels::parse_level;

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_FILE_NAME: &str = "app.log";
pub const DEFAULT_RETENTION: usize = 7;

/// Whether the console sink may colour its output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Colour only when the target is a terminal that supports it and
    /// `NO_COLOR` is not set.
    #[default]
    Auto,
    Always,
    Never,
}

/// Where the console sink writes.
#[derive(Clone, Debug, Default)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
    /// In-memory buffer, never treated as a terminal.
    Capture(CaptureBuffer),
}

/// Layout of the lines written to the log file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Text,
    /// One JSON object per line.
    #[cfg(feature = "json")]
    Json,
}

/// Shared in-memory writer for [`ConsoleTarget::Capture`].
#[derive(Clone, Debug, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    /// An empty buffer. Clones share the same storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        let mut buf = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Options accepted by [`init_with`](crate::init_with) and
/// [`Logger::build`](crate::Logger::build).
///
/// ```no_run
/// use plog::{Config, ColorChoice, LevelFilter};
///
/// let logger = plog::init_with(
///     Config::default()
///         .level(LevelFilter::Debug)
///         .log_dir("/var/log/myapp")
///         .retention(14)
///         .color(ColorChoice::Never),
/// )?;
/// # Ok::<(), plog::LoggerError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) level: LevelFilter,
    pub(crate) log_dir: PathBuf,
    pub(crate) file_name: String,
    pub(crate) retention: usize,
    pub(crate) color: ColorChoice,
    pub(crate) console: ConsoleTarget,
    pub(crate) file_format: FileFormat,
    pub(crate) panic_hook: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
            retention: DEFAULT_RETENTION,
            color: ColorChoice::Auto,
            console: ConsoleTarget::Stderr,
            file_format: FileFormat::Text,
            panic_hook: true,
        }
    }
}

impl Config {
    /// Sets the minimum severity written to both sinks.
    ///
    /// # Arguments
    ///
    /// * `level` - Threshold; records below it are dropped. Defaults to `Info`.
    ///
    /// # Returns
    ///
    /// The updated `Config`.
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Sets the directory holding the log files.
    ///
    /// # Arguments
    ///
    /// * `dir` - Created on init, including missing parents. Defaults to `logs`.
    ///
    /// # Returns
    ///
    /// The updated `Config`.
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Sets the file name prefix.
    ///
    /// # Arguments
    ///
    /// * `name` - Daily files are named `<name>.<YYYY-mm-dd>`. Defaults to `app.log`.
    ///
    /// # Returns
    ///
    /// The updated `Config`.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Sets how many rotated files are kept next to the current one.
    ///
    /// # Arguments
    ///
    /// * `files` - Older files past this count are deleted when a new day's
    ///   file is opened. `0` keeps all of them. Defaults to `7`.
    ///
    /// # Returns
    ///
    /// The updated `Config`.
    pub fn retention(mut self, files: usize) -> Self {
        self.retention = files;
        self
    }

    /// Sets whether the console sink may colour its output.
    ///
    /// # Arguments
    ///
    /// * `choice` - See [`ColorChoice`]. Defaults to `Auto`.
    ///
    /// # Returns
    ///
    /// The updated `Config`.
    pub fn color(mut self, choice: ColorChoice) -> Self {
        self.color = choice;
        self
    }

    /// Sets where console lines go. Defaults to stderr.
    pub fn console(mut self, target: ConsoleTarget) -> Self {
        self.console = target;
        self
    }

    /// Sets the layout of file lines. Defaults to [`FileFormat::Text`].
    pub fn file_format(mut self, format: FileFormat) -> Self {
        self.file_format = format;
        self
    }

    /// Install the panic hook on [`init_with`](crate::init_with). Defaults to `true`.
    pub fn panic_hook(mut self, install: bool) -> Self {
        self.panic_hook = install;
        self
    }

    /// Takes the level from `RUST_LOG` when it holds a bare level name.
    ///
    /// Directive lists such as `mycrate=debug` are ignored.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("RUST_LOG").and_then(|raw| parse_level(&raw).ok()) {
            self.level = level;
        }
        self
    }

    /// Configured threshold.
    pub fn get_level(&self) -> LevelFilter {
        self.level
    }

    pub fn get_log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn get_file_name(&self) -> &str {
        &self.file_name
    }

    /// Rotated files kept, `0` meaning all.
    pub fn get_retention(&self) -> usize {
        self.retention
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_choices() {
        let config = Config::default();
        assert_eq!(config.level, LevelFilter::Info);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.file_name, "app.log");
        assert_eq!(config.retention, 7);
        assert_eq!(config.color, ColorChoice::Auto);
        assert!(config.panic_hook);
    }

    #[test]
    fn rust_log_bare_level_overrides() {
        let config = Config::default().with_env_from(|key| {
            (key == "RUST_LOG").then(|| "debug".to_string())
        });
        assert_eq!(config.level, LevelFilter::Debug);
    }

    #[test]
    fn rust_log_directives_are_ignored() {
        let config = Config::default()
            .level(LevelFilter::Warn)
            .with_env_from(|_| Some("mycrate=trace".to_string()));
        assert_eq!(config.level, LevelFilter::Warn);
    }

    #[test]
    fn capture_buffer_collects_writes_from_clones() {
        let buffer = CaptureBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world").unwrap();
        assert_eq!(buffer.contents(), "hello world");
    }
}
