//! Background Mutation Tracking
//!
//! Counts in-flight fire-and-forget cache mutations so shutdown can wait
//! for them instead of leaking work.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

// == Pending Tasks ==
/// Counter of in-flight background tasks with a wakeup for waiters.
#[derive(Debug, Default)]
pub(crate) struct PendingTasks {
    count: AtomicUsize,
    notify: Notify,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one task. Must be paired with `finish`.
    pub fn start(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks one task done and wakes waiters when none remain.
    pub fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notify.notify_waiters();
        }
    }

    /// Number of tasks currently in flight.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Waits until no tasks remain in flight.
    pub async fn wait_idle(&self) {
        loop {
            // Arm the wakeup before checking the count so a finish between
            // the check and the await cannot be lost.
            let notified = self.notify.notified();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}
