use std::sync::Arc;

use halo_model::SlotState;

/// Inputs to the per-slot state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotEvent {
    LoadSucceeded,
    LoadFailed,
    BackoffElapsed,
}

/// Side effect the owner of a table must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotEffect {
    None,
    /// Arm (or re-arm) the backoff timer for the slot.
    ArmBackoff,
    /// Drop any pending backoff timer for the slot.
    CancelBackoff,
    /// The backoff window closed and the slot may be loaded again.
    Reattempt,
}

/// Pure transition function for a single slot.
///
/// A failure consumes one unit of the retry budget. The failure that brings
/// `retry_count` up to `max_retries` is terminal, so a slot never sits in
/// `Retrying` with an exhausted budget. `Loaded` and `Failed` absorb every
/// later event.
pub fn reduce(
    state: SlotState,
    event: SlotEvent,
    max_retries: u8,
) -> (SlotState, SlotEffect) {
    match event {
        SlotEvent::LoadSucceeded => {
            if state.is_terminal() {
                return (state, SlotEffect::None);
            }
            let next = SlotState {
                loaded: true,
                retrying: false,
                ..state
            };
            (next, SlotEffect::CancelBackoff)
        }
        SlotEvent::LoadFailed => {
            if state.is_terminal() {
                return (state, SlotEffect::None);
            }
            if state.retry_count >= max_retries {
                let next = SlotState {
                    failed: true,
                    retrying: false,
                    retry_count: max_retries,
                    ..state
                };
                return (next, SlotEffect::CancelBackoff);
            }

            let retry_count = state.retry_count + 1;
            if retry_count >= max_retries {
                let next = SlotState {
                    failed: true,
                    retrying: false,
                    retry_count,
                    ..state
                };
                (next, SlotEffect::CancelBackoff)
            } else {
                let next = SlotState {
                    retrying: true,
                    retry_count,
                    ..state
                };
                (next, SlotEffect::ArmBackoff)
            }
        }
        SlotEvent::BackoffElapsed => {
            if state.retrying && !state.is_terminal() {
                let next = SlotState {
                    retrying: false,
                    ..state
                };
                (next, SlotEffect::Reattempt)
            } else {
                (state, SlotEffect::None)
            }
        }
    }
}

/// Immutable snapshot of every slot. Transitions produce a new table and
/// leave the previous one untouched, so a render pass holding an older
/// snapshot never observes a half-applied update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTable {
    slots: Arc<[SlotState]>,
}

/// Result of applying one event to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub table: SlotTable,
    pub index: usize,
    pub previous: SlotState,
    pub current: SlotState,
    pub effect: SlotEffect,
}

impl SlotUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

impl SlotTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![SlotState::fresh(); len].into(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).copied()
    }

    pub fn as_slice(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotState> {
        self.slots.iter()
    }

    /// Apply `event` to slot `index`, returning `None` when the index is out
    /// of range.
    pub fn apply(
        &self,
        index: usize,
        event: SlotEvent,
        max_retries: u8,
    ) -> Option<SlotUpdate> {
        let previous = self.get(index)?;
        let (current, effect) = reduce(previous, event, max_retries);

        let table = if current == previous {
            self.clone()
        } else {
            let mut slots = self.slots.to_vec();
            slots[index] = current;
            SlotTable {
                slots: slots.into(),
            }
        };

        Some(SlotUpdate {
            table,
            index,
            previous,
            current,
            effect,
        })
    }
}
