use halo_model::{ResourceDescriptor, SlotState};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{
    RetryPolicy,
    scheduler::{BackoffExpired, RetryScheduler},
    table::{SlotEffect, SlotEvent, SlotTable, SlotUpdate},
};
use crate::error::{HaloError, Result};

/// Owns the slot table for one descriptor list together with the backoff
/// timers armed on its behalf.
///
/// Every mutation goes through [`SlotTable::apply`], which returns a fresh
/// snapshot; the store swaps it in and performs the requested timer effect.
/// The store is driven from a single task and performs no locking.
#[derive(Debug)]
pub struct SlotStore {
    policy: RetryPolicy,
    table: SlotTable,
    scheduler: RetryScheduler,
    generation: u64,
}

impl SlotStore {
    /// Create an empty store. Backoff expiries are posted on `expirations`
    /// and must be fed back through [`on_backoff_elapsed`](Self::on_backoff_elapsed).
    ///
    /// Arming a backoff spawns a timer task, so the store must be driven
    /// from within a Tokio runtime.
    pub fn new(
        policy: RetryPolicy,
        expirations: mpsc::UnboundedSender<BackoffExpired>,
    ) -> Self {
        Self {
            policy,
            table: SlotTable::default(),
            scheduler: RetryScheduler::new(expirations),
            generation: 0,
        }
    }

    /// Replace all slot state with fresh records, one per descriptor.
    /// Timers armed for the previous list are cancelled.
    pub fn init(&mut self, descriptors: &[ResourceDescriptor]) {
        let cancelled = self.scheduler.cancel_all();
        self.table = SlotTable::new(descriptors.len());
        self.generation += 1;
        debug!(
            slots = descriptors.len(),
            cancelled_timers = cancelled,
            generation = self.generation,
            "slot store initialised"
        );
    }

    /// Record a successful load. Idempotent; cancels a pending backoff.
    pub fn on_load_succeeded(&mut self, index: usize) -> Option<SlotState> {
        self.dispatch(index, SlotEvent::LoadSucceeded)
            .map(|update| update.current)
    }

    /// Record a failed load, arming a backoff while budget remains.
    /// Must be called from within a Tokio runtime when budget remains.
    pub fn on_load_failed(&mut self, index: usize) -> Option<SlotState> {
        let update = self.dispatch(index, SlotEvent::LoadFailed)?;
        if update.changed() && update.current.failed {
            warn!(
                slot = index,
                retries = update.current.retry_count,
                "image permanently failed after retries"
            );
        }
        Some(update.current)
    }

    /// Handle a backoff expiry from the scheduler. Returns `true` when the
    /// slot reopened and a new load attempt may be issued. Expiries for
    /// cancelled, superseded or discarded timers are ignored.
    pub fn on_backoff_elapsed(&mut self, expired: BackoffExpired) -> bool {
        if !self.scheduler.claim(&expired) {
            debug!(
                slot = expired.slot,
                ticket = ?expired.ticket,
                "ignoring stale backoff expiry"
            );
            return false;
        }

        self.dispatch(expired.slot, SlotEvent::BackoffElapsed)
            .is_some_and(|update| update.effect == SlotEffect::Reattempt)
    }

    /// Read-only copy of one slot.
    pub fn snapshot(&self, index: usize) -> Result<SlotState> {
        self.table.get(index).ok_or(HaloError::SlotOutOfRange {
            index,
            len: self.table.len(),
        })
    }

    /// The current immutable snapshot of every slot.
    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Bumped on every [`init`](Self::init); lets callers discard outcomes
    /// that belong to an earlier descriptor list.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.armed_count()
    }

    pub fn has_pending_timer(&self, index: usize) -> bool {
        self.scheduler.is_armed(index)
    }

    /// Cancel every timer and drop all slot state.
    pub fn teardown(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.table = SlotTable::default();
        self.generation += 1;
        debug!(cancelled_timers = cancelled, "slot store torn down");
    }

    fn dispatch(
        &mut self,
        index: usize,
        event: SlotEvent,
    ) -> Option<SlotUpdate> {
        let Some(update) =
            self.table.apply(index, event, self.policy.max_retries)
        else {
            warn!(
                slot = index,
                slots = self.table.len(),
                ?event,
                "dropping event for unknown slot"
            );
            return None;
        };

        match update.effect {
            SlotEffect::ArmBackoff => {
                self.scheduler.arm(index, self.policy.backoff);
            }
            SlotEffect::CancelBackoff => {
                self.scheduler.cancel(index);
            }
            SlotEffect::Reattempt | SlotEffect::None => {}
        }

        if update.changed() {
            debug!(
                slot = index,
                ?event,
                from = ?update.previous.phase(),
                to = ?update.current.phase(),
                retries = update.current.retry_count,
                "slot transition"
            );
        }

        self.table = update.table.clone();
        Some(update)
    }
}
