//! Rendezvous Module
//!
//! Counting semaphore used to hand completion from the resolver's thread to the
//! blocked caller.

use std::sync::{Condvar, Mutex, MutexGuard};

/// Counting semaphore starting at zero
pub struct Semaphore {
    count: Mutex<u32>,
    available: Condvar,
}

impl Semaphore {
    pub fn new() -> Self {
        Self {
            count: Mutex::new(0),
            available: Condvar::new(),
        }
    }

    // the count is valid even if a holder panicked
    fn lock(&self) -> MutexGuard<'_, u32> {
        self.count.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Increment the count and wake one waiter
    pub fn give(&self) {
        let mut count = self.lock();
        *count = count.saturating_add(1);
        self.available.notify_one();
    }

    /// Block until the count is positive, then decrement it
    pub fn take(&self) {
        let mut count = self.lock();
        while *count == 0 {
            count = self
                .available
                .wait(count)
                .unwrap_or_else(|e| e.into_inner());
        }
        *count -= 1;
    }

    pub fn count(&self) -> u32 {
        *self.lock()
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new()
    }
}
