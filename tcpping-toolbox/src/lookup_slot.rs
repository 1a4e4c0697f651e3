//! Last-request-wins result assignment.
//!
//! A new lookup request supersedes any still-outstanding previous one of the
//! same kind. In-flight calls from a superseded request are not aborted;
//! their results simply lose at commit time and are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Handle identifying one lookup request against a [`LookupSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

/// Holds the result of the most recent lookup request.
#[derive(Debug)]
pub struct LookupSlot<T> {
    latest: AtomicU64,
    value: Mutex<Option<T>>,
}

impl<T> Default for LookupSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LookupSlot<T> {
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            value: Mutex::new(None),
        }
    }

    /// Start a new lookup request.
    ///
    /// The previous result is discarded immediately — a fresh request must
    /// never be answered with stale data — and any older outstanding ticket
    /// is superseded.
    pub fn begin(&self) -> LookupTicket {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut value) = self.value.lock() {
            *value = None;
        }
        LookupTicket(ticket)
    }

    /// Store a finished lookup's result.
    ///
    /// Returns whether the commit won; a superseded ticket's value is
    /// dropped without touching the slot.
    pub fn commit(&self, ticket: LookupTicket, result: T) -> bool {
        if self.latest.load(Ordering::SeqCst) != ticket.0 {
            log::debug!("discarding result from superseded lookup #{}", ticket.0);
            return false;
        }
        if let Ok(mut value) = self.value.lock() {
            *value = Some(result);
            true
        } else {
            false
        }
    }

    /// The most recent committed result, if any.
    pub fn latest(&self) -> Option<T>
    where
        T: Clone,
    {
        self.value.lock().ok().and_then(|value| value.clone())
    }
}
