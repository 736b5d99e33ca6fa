//! Whole-cluster error flag.

use halo_model::{ResourceDescriptor, SlotState};

/// `true` when any descriptor is backend-flagged or any slot has terminally
/// failed. Evaluation stops at the first match.
pub fn has_error(
    descriptors: &[ResourceDescriptor],
    slots: &[SlotState],
) -> bool {
    descriptors.iter().any(|descriptor| descriptor.known_error)
        || slots.iter().any(|slot| slot.failed)
}
