//! Run control shared between the tick drivers and the outside world.
//!
//! Stop requests use an atomic flag plus a [`Notify`] so drivers parked
//! on their interval wake immediately instead of finishing the current
//! sleep. Atomics keep the per-tick check lock-free on the hot path.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Shared shutdown signal for the periodic drivers.
#[derive(Debug, Default)]
pub struct RunControl {
    stop_requested: AtomicBool,
    stop_notify: Notify,
}

impl RunControl {
    /// Create a control handle with no stop requested.
    pub const fn new() -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::const_new(),
        }
    }

    /// Request a clean stop and wake every waiting driver.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Resolve once a stop has been requested.
    ///
    /// Returns immediately if the flag is already set.
    pub async fn stopped(&self) {
        while !self.is_stop_requested() {
            let notified = self.stop_notify.notified();
            // Re-check after arming the notification to close the race
            // between the flag store and the notify.
            if self.is_stop_requested() {
                return;
            }
            notified.await;
        }
    }
}
