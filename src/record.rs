use chrono::{DateTime, Local};
use log::Level;

/// An owned log record, shared by every sink.
///
/// The `log` facade hands out borrowed records; this owned copy can also be
/// built by hand and passed to [`Logger::log`](crate::Logger::log).
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub level: Level,
    pub timestamp: DateTime<Local>,
    pub target: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub message: String,
    /// Rendered backtrace, set for panics.
    pub backtrace: Option<String>,
}

impl LogRecord {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            target: target.into(),
            file: None,
            line: None,
            message: message.into(),
            backtrace: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_backtrace(mut self, backtrace: impl Into<String>) -> Self {
        self.backtrace = Some(backtrace.into());
        self
    }

    pub(crate) fn from_log(record: &log::Record<'_>) -> Self {
        Self {
            level: record.level(),
            timestamp: Local::now(),
            target: record.target().to_string(),
            file: record.file().map(str::to_string),
            line: record.line(),
            message: record.args().to_string(),
            backtrace: None,
        }
    }
}
