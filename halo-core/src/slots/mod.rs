//! Per-slot load state: the reducer, the store that owns it and the backoff
//! timers the store arms on failure.

pub mod scheduler;
pub mod store;
pub mod table;

use std::time::Duration;

pub use halo_model::MAX_RETRIES;
pub use scheduler::{BackoffExpired, RetryScheduler, RetryTicket};
pub use store::SlotStore;
pub use table::{SlotEffect, SlotEvent, SlotTable, SlotUpdate, reduce};

/// Fixed wait between a failed attempt and re-attempt eligibility.
pub const BACKOFF_DELAY: Duration = Duration::from_millis(5_000);

/// Retry budget and backoff applied to every slot of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u8,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            backoff: BACKOFF_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u8, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}
