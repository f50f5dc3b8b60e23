//! Panic hook that writes panics to the registered logger.
//!
//! The hook records the panic, flushes both sinks, then runs the
//! hook that was installed before it. It never catches or retries anything:
//! unwinding and the exit status stay whatever they would have been.

use std::panic::{self, PanicHookInfo};
use std::sync::{Arc, Mutex, PoisonError};

use crate::facade;

type Hook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

static PREVIOUS: Mutex<Option<Arc<Hook>>> = Mutex::new(None);

pub(crate) fn install() {
    let mut previous = PREVIOUS.lock().unwrap_or_else(PoisonError::into_inner);
    if previous.is_some() {
        return;
    }

    let prior: Arc<Hook> = Arc::new(panic::take_hook());
    *previous = Some(prior.clone());

    panic::set_hook(Box::new(move |info| {
        if let Some(logger) = facade::current() {
            logger.record_panic(info);
        }
        prior(info);
    }));
}

/// Puts the hook that was active before [`install`] back.
pub(crate) fn uninstall() {
    let prior = PREVIOUS.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(prior) = prior {
        panic::set_hook(Box::new(move |info| prior(info)));
    }
}

pub(crate) fn is_installed() -> bool {
    PREVIOUS.lock().unwrap_or_else(PoisonError::into_inner).is_some()
}
