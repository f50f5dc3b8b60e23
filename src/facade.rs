//! Bridge between the `log` macros and the registered [`Logger`].
//!
//! `log` accepts a logger once per process, so a static forwarder is
//! registered the first time and the logger it forwards to lives in a slot
//! that `init` fills and `shutdown` empties.

use std::sync::{OnceLock, PoisonError, RwLock};

use log::{LevelFilter, Metadata, Record};

use crate::error::LoggerError;
use crate::prelude::{LogRecord, Logger};

static ACTIVE: RwLock<Option<Logger>> = RwLock::new(None);
static REGISTERED: OnceLock<bool> = OnceLock::new();
static FACADE: Facade = Facade;

struct Facade;

impl log::Log for Facade {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        current().is_some_and(|logger| logger.enabled(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if let Some(logger) = current() {
            if logger.enabled(record.level()) {
                logger.log(LogRecord::from_log(record));
            }
        }
    }

    fn flush(&self) {
        if let Some(logger) = current() {
            logger.flush();
        }
    }
}

/// Registers the forwarder with `log`. Later calls report the first outcome.
pub(crate) fn register() -> Result<(), LoggerError> {
    if *REGISTERED.get_or_init(|| log::set_logger(&FACADE).is_ok()) {
        Ok(())
    } else {
        Err(LoggerError::FacadeTaken)
    }
}

pub(crate) fn activate(logger: Logger) {
    log::set_max_level(logger.level());
    *ACTIVE.write().unwrap_or_else(PoisonError::into_inner) = Some(logger);
}

pub(crate) fn deactivate() -> Option<Logger> {
    log::set_max_level(LevelFilter::Off);
    ACTIVE.write().unwrap_or_else(PoisonError::into_inner).take()
}

pub(crate) fn current() -> Option<Logger> {
    ACTIVE.read().unwrap_or_else(PoisonError::into_inner).clone()
}

pub(crate) fn set_level(level: LevelFilter) {
    if let Some(logger) = current() {
        logger.set_level(level);
        log::set_max_level(level);
    }
}
