use std::path::PathBuf;

/// Failures that can happen while setting the logger up.
///
/// Only initialization and level parsing report errors. Once the sinks are
/// attached, write failures are swallowed so logging never takes the host
/// application down.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("could not create log directory {}: {source}", .path.display())]
    CreateLogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log directory {} is not writable: {source}", .path.display())]
    LogDirNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("another logger is already registered with the `log` facade")]
    FacadeTaken,

    #[error("unknown log level `{0}`")]
    InvalidLevel(String),
}
