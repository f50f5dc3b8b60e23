use log::{Level, LevelFilter};

use crate::error::LoggerError;

pub(crate) const RESET: &str = "\x1b[0m";
pub(crate) const DIM: &str = "\x1b[90m";

/// SGR colour used by the hand-written ANSI console style.
pub(crate) fn ansi_colour(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m",
        Level::Warn => "\x1b[33m",
        Level::Info => "\x1b[32m",
        Level::Debug => "\x1b[36m",
        Level::Trace => "\x1b[90m",
    }
}

pub(crate) fn emoji(level: Level) -> &'static str {
    match level {
        Level::Error => "🛑",
        Level::Warn => "⚠️",
        Level::Info => "ℹ️",
        Level::Debug => "🐞",
        Level::Trace => "🔎",
    }
}

/// Upper-case level name, as written to the console and the file.
pub(crate) fn label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

pub(crate) fn filter_from_usize(raw: usize) -> LevelFilter {
    match raw {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Parses a level name, case-insensitively.
///
/// Accepts the `log` crate names plus `WARNING` and `CRITICAL`, which map to
/// `Warn` and `Error`.
pub fn parse_level(name: &str) -> Result<LevelFilter, LoggerError> {
    let trimmed = name.trim();
    match trimmed.to_ascii_uppercase().as_str() {
        "WARNING" => Ok(LevelFilter::Warn),
        "CRITICAL" | "FATAL" => Ok(LevelFilter::Error),
        _ => trimmed
            .parse::<LevelFilter>()
            .map_err(|_| LoggerError::InvalidLevel(trimmed.to_string())),
    }
}
