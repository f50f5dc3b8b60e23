use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::error::LoggerError;

/// Date suffix `tracing_appender` puts on daily files.
const DATE_SUFFIX: &str = "%Y-%m-%d";

/// File half of the logger: a daily [`RollingFileAppender`] behind a mutex.
///
/// Files are named `<file_name>.<YYYY-mm-dd>` and roll over at UTC midnight.
/// Every write goes straight to the file descriptor, so nothing is left in
/// user-space buffers when the process exits.
pub(crate) struct FileSink {
    dir: PathBuf,
    file_name: String,
    appender: Mutex<RollingFileAppender>,
}

impl FileSink {
    /// Opens today's file in `dir`.
    ///
    /// # Arguments
    ///
    /// * `retention` - Rotated files to keep besides the active one. `0` keeps all.
    pub(crate) fn open(dir: &Path, file_name: &str, retention: usize) -> Result<Self, LoggerError> {
        if retention > 0 {
            prune_earlier_runs(dir, file_name, retention);
        }

        let mut builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(file_name);
        if retention > 0 {
            // The appender counts the active file too.
            builder = builder.max_log_files(retention + 1);
        }

        let appender = builder.build(dir).map_err(|source| LoggerError::OpenLogFile {
            path: dir.join(file_name),
            source,
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            file_name: file_name.to_string(),
            appender: Mutex::new(appender),
        })
    }

    /// Appends `line`. Failures are dropped.
    pub(crate) fn write_line(&self, line: &str) {
        let mut appender = self.appender.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = appender.write_all(line.as_bytes());
    }

    pub(crate) fn flush(&self) {
        let mut appender = self.appender.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = appender.flush();
    }

    /// Path of the file written today.
    pub(crate) fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.file_name, Utc::now().format(DATE_SUFFIX)))
    }

    /// Every file of this sink in the log directory, oldest name first.
    pub(crate) fn files(&self) -> Vec<PathBuf> {
        dated_files(&self.dir, &self.file_name)
    }
}

fn dated_files(dir: &Path, file_name: &str) -> Vec<PathBuf> {
    let prefix = format!("{file_name}.");
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_str().is_some_and(|name| name.starts_with(&prefix)))
        .map(|entry| entry.path())
        .collect();
    files.sort();
    files
}

/// Applies `retention` to files left by earlier processes.
///
/// The appender only prunes when it rolls over, so a program that never runs
/// past midnight would otherwise keep every day's file. Dates in the names
/// sort chronologically; today's file is never removed.
fn prune_earlier_runs(dir: &Path, file_name: &str, retention: usize) {
    let today = format!("{file_name}.{}", Utc::now().format(DATE_SUFFIX));
    let rotated: Vec<PathBuf> = dated_files(dir, file_name)
        .into_iter()
        .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some(today.as_str()))
        .collect();

    let excess = rotated.len().saturating_sub(retention);
    for stale in &rotated[..excess] {
        let _ = fs::remove_file(stale);
    }
}
