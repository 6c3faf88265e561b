//! Ctrl-C Handling
//!
//! SIGINT only sets a flag; the executor polls it between progress events
//! and turns it into a sweep cancellation. The handler is only in place
//! while a sweep runs; [`restore`] puts the default disposition back.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Whether Ctrl-C was pressed since the last [`reset`]
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::Relaxed)
}

/// Clear the interrupt flag
pub fn reset() {
    INTERRUPTED.store(false, Ordering::Relaxed);
}

/// Set the flag as the SIGINT handler would
#[cfg(test)]
pub fn raise() {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// Serializes tests that touch the process-wide flag or SIGINT disposition
#[cfg(test)]
pub static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Install the SIGINT handler. The handler is async-signal-safe (only sets
/// an atomic).
#[cfg(unix)]
pub fn install() {
    set_disposition(sigint_handler as *const () as libc::sighandler_t);
}

/// Put back the default SIGINT disposition, so Ctrl-C terminates again.
#[cfg(unix)]
pub fn restore() {
    set_disposition(libc::SIG_DFL);
}

#[cfg(unix)]
fn set_disposition(handler: libc::sighandler_t) {
    // SAFETY: the sigaction struct is zeroed and its mask emptied; the
    // installed handler only touches an atomic.
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handler;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut sa.sa_mask);
        libc::sigaction(libc::SIGINT, &sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigint_handler(_sig: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// No-op on non-Unix; Ctrl-C keeps its default behavior there.
#[cfg(not(unix))]
pub fn install() {}

/// No-op on non-Unix.
#[cfg(not(unix))]
pub fn restore() {}
