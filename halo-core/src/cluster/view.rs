use std::fmt;

use halo_model::{
    CLUSTER_POSITIONS, ImageSet, SlotState, SlotStatus, SlotVariant,
};
use serde::Serialize;

use crate::{aggregate::has_error, status::project_all};

/// Everything a render pass needs: per-position statuses and the aggregate
/// error flag. Carries no timer handles or other internal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub slots: Vec<SlotStatus>,
    pub has_error: bool,
}

impl ClusterView {
    /// Project `slots` against the descriptors of `set`. At least
    /// [`CLUSTER_POSITIONS`] positions are always rendered.
    pub fn project(set: &ImageSet, slots: &[SlotState]) -> Self {
        let positions = CLUSTER_POSITIONS.max(set.images.len());
        Self {
            name: set.name.clone(),
            location: set.location.clone(),
            slots: project_all(&set.images, slots, positions),
            has_error: has_error(&set.images, slots),
        }
    }

    /// No slot is waiting on a load attempt or a backoff.
    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(|status| {
            !matches!(status.variant, SlotVariant::Pending | SlotVariant::Retrying)
        })
    }
}

impl fmt::Display for ClusterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if let Some(location) = &self.location {
            writeln!(f, "  {location}")?;
        }
        for (index, status) in self.slots.iter().enumerate() {
            writeln!(f, "  [{}] {status}", index + 1)?;
        }
        if self.has_error {
            writeln!(f, "  (!) one or more images need attention")?;
        }
        Ok(())
    }
}
