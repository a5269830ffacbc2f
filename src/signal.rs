//! SIGINT/SIGTERM interception.
//!
//! The handler only records that a signal arrived. Child processes share the
//! terminal's process group, receive the signal themselves, and are left to
//! finish; the coordinator notices the flag at the next stage boundary and
//! unwinds through [`Error::Interrupted`] so scoped resources are dropped.

use crate::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn record_signal(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the handler for SIGINT and SIGTERM.
#[cfg(unix)]
#[allow(unsafe_code)]
pub fn install() {
    let handler = record_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
    // SAFETY: the handler only performs an atomic store, which is
    // async-signal-safe.
    unsafe {
        if libc::signal(libc::SIGINT, handler) == libc::SIG_ERR {
            log::warn!("could not install SIGINT handler");
        }
        if libc::signal(libc::SIGTERM, handler) == libc::SIG_ERR {
            log::warn!("could not install SIGTERM handler");
        }
    }
}

#[cfg(not(unix))]
pub fn install() {}

/// Fail with [`Error::Interrupted`] once an interrupt has been received.
pub fn check() -> Result<(), Error> {
    check_flag(&INTERRUPTED)
}

fn check_flag(flag: &AtomicBool) -> Result<(), Error> {
    if flag.load(Ordering::SeqCst) {
        Err(Error::Interrupted)
    } else {
        Ok(())
    }
}
