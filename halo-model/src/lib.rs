//! Core data model definitions shared across Halo crates.
#![allow(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod slot;
pub mod status;

// Intentionally curated re-exports for downstream consumers.
pub use descriptor::{CLUSTER_POSITIONS, ImageSet, ResourceDescriptor};
pub use error::{ModelError, Result as ModelResult};
pub use slot::{MAX_RETRIES, SlotPhase, SlotState};
pub use status::{SlotStatus, SlotVariant};
