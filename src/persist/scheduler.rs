//! Debounced save scheduling.

use std::time::{Duration, Instant};

/// Cancellable deadline for the next save.
///
/// Every request cancels the pending deadline and arms a new one, so a burst
/// of edits produces a single save once the burst goes quiet.
#[derive(Clone, Debug)]
pub struct SaveScheduler {
    debounce: Duration,
    deadline: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Re-arm: cancel any pending save and schedule one `debounce` from now.
    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.debounce);
    }

    /// True once when the pending deadline has passed; disarms it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending save. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
