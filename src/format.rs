use crate::config::FileFormat;
use crate::levels::label;
use crate::record::LogRecord;

pub(crate) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a record as the bytes written to the log file, newline included.
pub(crate) fn file_line(format: FileFormat, record: &LogRecord) -> String {
    match format {
        FileFormat::Text => text_line(record),
        #[cfg(feature = "json")]
        FileFormat::Json => json_line(record),
    }
}

fn text_line(record: &LogRecord) -> String {
    let mut line = format!(
        "{} {:<8} {} » {}\n",
        record.timestamp.format(TIME_FORMAT),
        label(record.level),
        record.target,
        record.message,
    );
    if let Some(trace) = &record.backtrace {
        line.push_str(trace.trim_end());
        line.push('\n');
    }
    line
}

#[cfg(feature = "json")]
fn json_line(record: &LogRecord) -> String {
    use chrono::{SecondsFormat, Utc};

    #[derive(serde::Serialize)]
    struct Line<'a> {
        timestamp: String,
        level: &'static str,
        name: &'a str,
        message: &'a str,
        pathname: Option<&'a str>,
        lineno: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        exc_info: Option<&'a str>,
    }

    let line = Line {
        timestamp: record
            .timestamp
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Micros, true),
        level: label(record.level),
        name: &record.target,
        message: &record.message,
        pathname: record.file.as_deref(),
        lineno: record.line,
        exc_info: record.backtrace.as_deref(),
    };

    match serde_json::to_string(&line) {
        Ok(mut json) => {
            json.push('\n');
            json
        }
        Err(_) => text_line(record),
    }
}
