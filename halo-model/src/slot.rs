#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of failed-load re-attempts before a slot is terminally failed.
pub const MAX_RETRIES: u8 = 3;

/// Per-slot load bookkeeping. One record exists per descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotState {
    pub loaded: bool,
    pub failed: bool,
    pub retry_count: u8,
    pub retrying: bool,
}

/// Named states of the per-slot load state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SlotPhase {
    /// Waiting for a load outcome.
    Pending,
    /// A failure was recorded and the backoff timer is armed.
    Retrying,
    /// Terminal: the resource loaded.
    Loaded,
    /// Terminal: the retry budget is exhausted.
    Failed,
}

impl SlotState {
    pub const fn fresh() -> Self {
        Self {
            loaded: false,
            failed: false,
            retry_count: 0,
            retrying: false,
        }
    }

    pub fn phase(&self) -> SlotPhase {
        if self.loaded {
            SlotPhase::Loaded
        } else if self.failed {
            SlotPhase::Failed
        } else if self.retrying {
            SlotPhase::Retrying
        } else {
            SlotPhase::Pending
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.loaded || self.failed
    }

    /// Checks every per-slot invariant for the given retry budget.
    pub fn holds_invariants(&self, max_retries: u8) -> bool {
        self.retry_count <= max_retries
            && (!self.failed || self.retry_count == max_retries)
            && !(self.loaded && self.failed)
            && (!self.retrying || (!self.loaded && !self.failed))
    }
}

impl SlotPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SlotPhase::Loaded | SlotPhase::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_pending() {
        let state = SlotState::fresh();
        assert_eq!(state, SlotState::default());
        assert_eq!(state.phase(), SlotPhase::Pending);
        assert!(state.holds_invariants(MAX_RETRIES));
    }

    #[test]
    fn phase_prefers_terminal_flags() {
        let loaded = SlotState {
            loaded: true,
            retry_count: 2,
            ..SlotState::fresh()
        };
        assert_eq!(loaded.phase(), SlotPhase::Loaded);
        assert!(loaded.is_terminal());

        let retrying = SlotState {
            retrying: true,
            retry_count: 1,
            ..SlotState::fresh()
        };
        assert_eq!(retrying.phase(), SlotPhase::Retrying);
        assert!(!retrying.phase().is_terminal());
    }

    #[test]
    fn invariants_reject_inconsistent_records() {
        let early_failure = SlotState {
            failed: true,
            retry_count: 1,
            ..SlotState::fresh()
        };
        assert!(!early_failure.holds_invariants(MAX_RETRIES));

        let both = SlotState {
            loaded: true,
            failed: true,
            retry_count: MAX_RETRIES,
            retrying: false,
        };
        assert!(!both.holds_invariants(MAX_RETRIES));

        let over_budget = SlotState {
            retry_count: MAX_RETRIES + 1,
            ..SlotState::fresh()
        };
        assert!(!over_budget.holds_invariants(MAX_RETRIES));
    }
}
