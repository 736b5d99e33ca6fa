//! Projection of a slot onto the closed set of display statuses.

use halo_model::{ResourceDescriptor, SlotState, SlotStatus, SlotVariant};

/// Map a descriptor and its slot state to a display status.
///
/// Rules are checked in order and the first match wins, so descriptor flags
/// always take precedence over load outcomes: a backend-flagged resource
/// shows `Error` whatever its slot state says.
pub fn project(
    descriptor: Option<&ResourceDescriptor>,
    state: &SlotState,
) -> SlotStatus {
    let Some(descriptor) = descriptor else {
        return SlotStatus::new(SlotVariant::Empty, "Empty slot");
    };

    if descriptor.known_error {
        return SlotStatus::new(SlotVariant::Error, "Backend error");
    }
    if !descriptor.ready {
        return SlotStatus::new(SlotVariant::NotReady, "Not ready");
    }

    let retries = state.retry_count;
    if state.retrying {
        return SlotStatus::new(
            SlotVariant::Retrying,
            format!("Loading / Retrying (Retry count: {retries})"),
        );
    }
    if state.failed {
        return SlotStatus::new(
            SlotVariant::Error,
            format!("Error after retries (Retry count: {retries})"),
        );
    }
    if state.loaded {
        return if retries > 0 {
            SlotStatus::new(
                SlotVariant::Loaded,
                format!("Loaded (Retry count: {retries})"),
            )
        } else {
            SlotStatus::new(SlotVariant::Loaded, "Loaded")
        };
    }

    SlotStatus::new(SlotVariant::Pending, "Loading")
}

/// Project every position of a cluster. Positions past the end of
/// `descriptors` (or of `slots`) project as absent.
pub fn project_all(
    descriptors: &[ResourceDescriptor],
    slots: &[SlotState],
    positions: usize,
) -> Vec<SlotStatus> {
    (0..positions)
        .map(|index| {
            let state = slots.get(index).copied().unwrap_or_default();
            project(descriptors.get(index), &state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_model::MAX_RETRIES;

    fn every_state() -> Vec<SlotState> {
        let mut states = Vec::new();
        for retry_count in 0..=MAX_RETRIES {
            for bits in 0..16u8 {
                states.push(SlotState {
                    loaded: bits & 1 != 0,
                    failed: bits & 2 != 0,
                    retrying: bits & 4 != 0,
                    retry_count: if bits & 8 != 0 { retry_count } else { 0 },
                });
            }
        }
        states
    }

    #[test]
    fn absent_descriptor_is_empty() {
        let status = project(None, &SlotState::fresh());
        assert_eq!(status, SlotStatus::new(SlotVariant::Empty, "Empty slot"));
    }

    #[test]
    fn known_error_wins_over_any_state() {
        let descriptor = ResourceDescriptor::flagged("https://x");
        for state in every_state() {
            let status = project(Some(&descriptor), &state);
            assert_eq!(status.variant, SlotVariant::Error);
            assert_eq!(status.explanation, "Backend error");
        }

        let unprovisioned_and_flagged = ResourceDescriptor {
            ready: false,
            ..descriptor
        };
        assert_eq!(
            project(Some(&unprovisioned_and_flagged), &SlotState::fresh())
                .explanation,
            "Backend error"
        );
    }

    #[test]
    fn not_ready_wins_over_any_state() {
        let descriptor = ResourceDescriptor::not_ready("https://x");
        for state in every_state() {
            let status = project(Some(&descriptor), &state);
            assert_eq!(status.variant, SlotVariant::NotReady);
            assert_eq!(status.explanation, "Not ready");
        }
    }

    #[test]
    fn load_states_project_in_order() {
        let descriptor = ResourceDescriptor::ready("https://x");
        let cases = [
            (SlotState::fresh(), SlotVariant::Pending, "Loading"),
            (
                SlotState {
                    retrying: true,
                    retry_count: 2,
                    ..SlotState::fresh()
                },
                SlotVariant::Retrying,
                "Loading / Retrying (Retry count: 2)",
            ),
            (
                SlotState {
                    failed: true,
                    retry_count: 3,
                    ..SlotState::fresh()
                },
                SlotVariant::Error,
                "Error after retries (Retry count: 3)",
            ),
            (
                SlotState {
                    loaded: true,
                    retry_count: 1,
                    ..SlotState::fresh()
                },
                SlotVariant::Loaded,
                "Loaded (Retry count: 1)",
            ),
            (
                SlotState {
                    loaded: true,
                    ..SlotState::fresh()
                },
                SlotVariant::Loaded,
                "Loaded",
            ),
        ];

        for (state, variant, explanation) in cases {
            let status = project(Some(&descriptor), &state);
            assert_eq!(status.variant, variant, "{state:?}");
            assert_eq!(status.explanation, explanation, "{state:?}");
        }
    }

    #[test]
    fn retrying_flag_outranks_failed_flag() {
        let descriptor = ResourceDescriptor::ready("https://x");
        let state = SlotState {
            retrying: true,
            failed: true,
            retry_count: 3,
            loaded: false,
        };
        assert_eq!(
            project(Some(&descriptor), &state).variant,
            SlotVariant::Retrying
        );
    }

    #[test]
    fn project_all_pads_missing_positions() {
        let descriptors = vec![ResourceDescriptor::ready("https://x")];
        let statuses = project_all(&descriptors, &[SlotState::fresh()], 4);
        assert_eq!(statuses.len(), 4);
        assert_eq!(statuses[0].variant, SlotVariant::Pending);
        assert!(statuses[1..].iter().all(|s| s.variant == SlotVariant::Empty));
    }
}
