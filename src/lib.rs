#![cfg_attr(docsrs, feature(doc_cfg))]

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
//! <br><br>
//!
//! ## You're probably looking for:
//! * [`init`] / [`init_with`]
//! * [`Config`]
//! * [`Logger`]

use std::sync::OnceLock;

pub mod prelude;
pub mod error;
pub mod config;
pub(crate) mod console;
pub(crate) mod facade;
pub(crate) mod format;
pub(crate) mod hook;
pub(crate) mod levels;
pub(crate) mod record;
pub(crate) mod rotate;
pub(crate) mod sync;

pub use config::{CaptureBuffer, ColorChoice, Config, ConsoleTarget, FileFormat};
pub use levels::parse_level;
pub use log::{Level, LevelFilter};
pub use prelude::{
    ConsoleStyle, LogRecord, Logger, LoggerError, SinkKind
};

use sync::{Entry, InitGate};

fn gate() -> &'static InitGate {
    static GATE: OnceLock<InitGate> = OnceLock::new();
    GATE.get_or_init(InitGate::new)
}

/// Sets logging up with the default [`Config`].
///
/// ```no_run
/// fn main() -> Result<(), plog::LoggerError> {
///     plog::init()?;
///     log::info!("ready");
///     Ok(())
/// }
/// ```
pub fn init() -> Result<Logger, LoggerError> {
    init_with(Config::default())
}

/// Attaches a console sink and a rotating file sink to the `log` facade and,
/// unless disabled, installs the panic hook.
///
/// Only the first successful call configures anything. Later calls return
/// the logger that is already registered and ignore `config`; call
/// [`shutdown`] first to start over with different options.
///
/// # Errors
///
/// Fails when the log directory cannot be created or written to, when the
/// log file cannot be opened, or when another logger already owns the `log`
/// facade. A failed call leaves nothing registered.
pub fn init_with(config: Config) -> Result<Logger, LoggerError> {
    let gate = gate();
    loop {
        match gate.enter() {
            Entry::Ready => {
                if let Some(logger) = facade::current() {
                    return Ok(logger);
                }
            }
            Entry::Owner => {
                let install_hook = config.panic_hook;
                let built = facade::register().and_then(|()| Logger::build(config));
                let logger = match built {
                    Ok(logger) => logger,
                    Err(e) => {
                        gate.abandon();
                        return Err(e);
                    }
                };

                facade::activate(logger.clone());
                if install_hook {
                    hook::install();
                }
                gate.open();

                log::debug!(
                    target: "plog",
                    "logging to {} (level {}, style {:?})",
                    logger.file_path().display(), logger.level(), logger.console_style()
                );
                return Ok(logger);
            }
        }
    }
}

/// The registered logger.
///
/// # Returns
///
/// `Some(logger)` between a successful [`init`] and [`shutdown`], `None`
/// otherwise. Nothing is set up as a side effect; see [`logger_or_init`].
pub fn logger() -> Option<Logger> {
    facade::current()
}

/// The registered logger, setting logging up with the default [`Config`]
/// first when nothing is registered yet.
///
/// ```no_run
/// let logger = plog::logger_or_init()?;
/// logger.log(plog::LogRecord::new(plog::Level::Info, "app", "hello"));
/// # Ok::<(), plog::LoggerError>(())
/// ```
///
/// # Errors
///
/// The same as [`init`], when the default setup has to run and fails.
pub fn logger_or_init() -> Result<Logger, LoggerError> {
    match facade::current() {
        Some(logger) => Ok(logger),
        None => init(),
    }
}

/// Whether a logger is registered.
///
/// # Returns
///
/// `true` once [`init`] or [`init_with`] has succeeded, and `false` again
/// after [`shutdown`].
pub fn is_initialized() -> bool {
    gate().is_ready()
}

/// Changes the threshold of the registered logger and of the `log` facade.
/// Does nothing before [`init`].
pub fn set_level(level: LevelFilter) {
    facade::set_level(level);
}

/// Logs `error` and its source chain through the registered logger.
///
/// Meant for the end of `main`, where an error would otherwise only reach
/// stderr.
pub fn report(error: &(dyn std::error::Error + 'static)) {
    if let Some(logger) = facade::current() {
        logger.report(error);
    }
}

/// Flushes and detaches the registered logger and restores the panic hook
/// that was active before [`init`].
///
/// `log` macros become no-ops until the next [`init`].
pub fn shutdown() {
    let gate = gate();
    if !gate.close() {
        return;
    }

    log::debug!(target: "plog", "logging shut down");
    hook::uninstall();
    if let Some(logger) = facade::deactivate() {
        logger.flush();
    }
    gate.abandon();
}

/// Whether the panic hook is currently installed.
///
/// # Returns
///
/// `false` before [`init`], when [`Config::panic_hook`] was turned off, and
/// after [`shutdown`].
pub fn panic_hook_installed() -> bool {
    hook::is_installed()
}
