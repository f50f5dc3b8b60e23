use std::io::{IsTerminal, Write};
use std::sync::Mutex;

use crate::config::{ColorChoice, ConsoleTarget};
use crate::format::TIME_FORMAT;
use crate::levels::{ansi_colour, emoji, label, DIM, RESET};
use crate::record::LogRecord;

/// How the console sink decorates its lines. Picked once when the sink is
/// built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleStyle {
    /// Styled through the `colored` crate.
    Rich,
    /// Hand-written SGR escape codes.
    Ansi,
    /// No escape sequences and no emoji.
    Plain,
}

/// What we know about the console target.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Terminal {
    pub is_terminal: bool,
    pub no_color: bool,
    pub dumb: bool,
}

impl Terminal {
    pub(crate) fn detect(target: &ConsoleTarget) -> Self {
        Self::detect_with(target, |key| std::env::var(key).ok())
    }

    fn detect_with(target: &ConsoleTarget, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_terminal = match target {
            ConsoleTarget::Stderr => std::io::stderr().is_terminal(),
            ConsoleTarget::Stdout => std::io::stdout().is_terminal(),
            ConsoleTarget::Capture(_) => false,
        };
        Self {
            is_terminal,
            no_color: lookup("NO_COLOR").is_some_and(|v| !v.is_empty()),
            dumb: lookup("TERM").is_some_and(|v| v == "dumb"),
        }
    }
}

impl ConsoleStyle {
    pub(crate) fn resolve(choice: ColorChoice, terminal: Terminal, rich_available: bool) -> Self {
        let coloured = match choice {
            ColorChoice::Never => false,
            ColorChoice::Always => true,
            ColorChoice::Auto => terminal.is_terminal && !terminal.no_color && !terminal.dumb,
        };

        match (coloured, rich_available) {
            (false, _) => ConsoleStyle::Plain,
            (true, true) => ConsoleStyle::Rich,
            (true, false) => ConsoleStyle::Ansi,
        }
    }

    pub(crate) fn render(self, record: &LogRecord) -> String {
        let ts = record.timestamp.format(TIME_FORMAT);
        let name = label(record.level);

        let mut line = match self {
            ConsoleStyle::Plain => format!("{} {:<8} {}\n", ts, name, record.message),
            ConsoleStyle::Ansi => format!(
                "{DIM}{}{RESET} {}{:<8}{RESET} {} {}\n",
                ts, ansi_colour(record.level), name, emoji(record.level), record.message
            ),
            ConsoleStyle::Rich => rich_line(record),
        };

        if let Some(trace) = &record.backtrace {
            line.push_str(trace.trim_end());
            line.push('\n');
        }
        line
    }
}

#[cfg(feature = "rich")]
fn rich_line(record: &LogRecord) -> String {
    use colored::Color;
    use log::Level;

    let (colour, bold) = match record.level {
        Level::Error => (Color::BrightRed, true),
        Level::Warn => (Color::BrightYellow, true),
        Level::Info => (Color::BrightGreen, false),
        Level::Debug => (Color::BrightCyan, false),
        Level::Trace => (Color::BrightBlack, false),
    };
    let ts = record.timestamp.format(TIME_FORMAT).to_string();
    let name = format!("{:<8}", label(record.level));

    format!(
        "{} {} {} {} {}\n",
        paint(&ts, Color::BrightBlack, false),
        paint(&name, colour, bold),
        emoji(record.level),
        record.message,
        paint(&record.target, Color::BrightBlack, false),
    )
}

/// Wraps `text` in the SGR codes for `colour`.
///
/// The `Colorize` helpers consult `colored`'s process-wide switch on every
/// write; the style has already been decided here, so only the palette is
/// taken from `colored`.
#[cfg(feature = "rich")]
fn paint(text: &str, colour: colored::Color, bold: bool) -> String {
    let weight = if bold { "1;" } else { "" };
    format!("\x1b[{weight}{}m{text}{RESET}", colour.to_fg_str())
}

#[cfg(not(feature = "rich"))]
fn rich_line(record: &LogRecord) -> String {
    ConsoleStyle::Ansi.render(&LogRecord { backtrace: None, ..record.clone() })
}

/// Console half of the logger. One line is written at a time.
pub(crate) struct ConsoleSink {
    style: ConsoleStyle,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub(crate) fn new(target: &ConsoleTarget, choice: ColorChoice) -> Self {
        let style = ConsoleStyle::resolve(choice, Terminal::detect(target), cfg!(feature = "rich"));

        let writer: Box<dyn Write + Send> = match target {
            ConsoleTarget::Stderr => Box::new(std::io::stderr()),
            ConsoleTarget::Stdout => Box::new(std::io::stdout()),
            ConsoleTarget::Capture(buffer) => Box::new(buffer.clone()),
        };

        Self { style, writer: Mutex::new(writer) }
    }

    pub(crate) fn style(&self) -> ConsoleStyle {
        self.style
    }

    pub(crate) fn emit(&self, record: &LogRecord) {
        let line = self.style.render(record);
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writer.write_all(line.as_bytes());
    }

    pub(crate) fn flush(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writer.flush();
    }
}
