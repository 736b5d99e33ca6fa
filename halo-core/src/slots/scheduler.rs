use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one arming of a slot timer. Tickets are never reused within a
/// scheduler, so an expiry carrying an old ticket can always be told apart
/// from the timer currently armed for the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RetryTicket(u64);

/// Message delivered on the expiry channel when a backoff timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackoffExpired {
    pub slot: usize,
    pub ticket: RetryTicket,
}

/// Arena of one-shot backoff timers keyed by slot index.
///
/// Each armed timer is a sleeping task that posts a [`BackoffExpired`] onto
/// the owner's event queue. At most one timer is outstanding per slot; arming
/// again aborts the previous task. Because an expiry may already sit in the
/// queue when a timer is cancelled, the owner must [`claim`](Self::claim) each
/// expiry before acting on it: cancelled and superseded tickets are refused.
#[derive(Debug)]
pub struct RetryScheduler {
    expirations: mpsc::UnboundedSender<BackoffExpired>,
    timers: HashMap<usize, ArmedTimer>,
    next_ticket: u64,
}

#[derive(Debug)]
struct ArmedTimer {
    ticket: RetryTicket,
    task: JoinHandle<()>,
}

impl RetryScheduler {
    pub fn new(expirations: mpsc::UnboundedSender<BackoffExpired>) -> Self {
        Self {
            expirations,
            timers: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Schedule a one-shot expiry for `slot` after `delay`, superseding any
    /// timer already armed for it. Must be called from within a Tokio runtime.
    pub fn arm(&mut self, slot: usize, delay: Duration) -> RetryTicket {
        self.cancel(slot);

        let ticket = RetryTicket(self.next_ticket);
        self.next_ticket += 1;

        let expirations = self.expirations.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver disappears when the owning session shuts down.
            let _ = expirations.send(BackoffExpired { slot, ticket });
        });

        self.timers.insert(slot, ArmedTimer { ticket, task });
        tracing::trace!(slot, ?ticket, ?delay, "backoff timer armed");
        ticket
    }

    /// Cancel the timer armed for `slot`, if any.
    pub fn cancel(&mut self, slot: usize) -> bool {
        match self.timers.remove(&slot) {
            Some(timer) => {
                timer.task.abort();
                tracing::trace!(slot, ticket = ?timer.ticket, "backoff timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel a timer through the handle returned by [`arm`](Self::arm).
    /// Does nothing if the slot has since been re-armed or cancelled.
    pub fn cancel_ticket(&mut self, slot: usize, ticket: RetryTicket) -> bool {
        let current = self.timers.get(&slot).map(|timer| timer.ticket);
        if current == Some(ticket) {
            self.cancel(slot)
        } else {
            false
        }
    }

    /// Cancel every outstanding timer, returning how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        for (_, timer) in self.timers.drain() {
            timer.task.abort();
        }
        count
    }

    /// Accept an expiry if it belongs to the timer currently armed for its
    /// slot. A claimed timer is retired; stale expiries return `false`.
    pub fn claim(&mut self, expired: &BackoffExpired) -> bool {
        match self.timers.get(&expired.slot) {
            Some(timer) if timer.ticket == expired.ticket => {
                self.timers.remove(&expired.slot);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self, slot: usize) -> bool {
        self.timers.contains_key(&slot)
    }

    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for RetryScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
