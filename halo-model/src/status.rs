use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed set of display statuses a slot may project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SlotVariant {
    Empty,
    NotReady,
    Error,
    Retrying,
    Loaded,
    Pending,
}

impl SlotVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            SlotVariant::Empty => "Empty",
            SlotVariant::NotReady => "NotReady",
            SlotVariant::Error => "Error",
            SlotVariant::Retrying => "Retrying",
            SlotVariant::Loaded => "Loaded",
            SlotVariant::Pending => "Pending",
        }
    }

    /// Whether the render layer should draw the error badge for this slot.
    pub const fn is_error(self) -> bool {
        matches!(self, SlotVariant::Error)
    }
}

impl fmt::Display for SlotVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-safe projection of a slot: a variant plus a tooltip text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotStatus {
    pub variant: SlotVariant,
    pub explanation: String,
}

impl SlotStatus {
    pub fn new(variant: SlotVariant, explanation: impl Into<String>) -> Self {
        Self {
            variant,
            explanation: explanation.into(),
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.variant, self.explanation)
    }
}
