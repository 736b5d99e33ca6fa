use std::fmt;

use halo_model::ImageSet;

use crate::error::{HaloError, Result};

/// Page-level state around the descriptor fetch.
///
/// A failed fetch is terminal for the page; recovery is a manual, full
/// re-fetch by the user and never goes through the per-slot retry logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Failed(String),
    Empty,
    Ready(ImageSet),
}

impl PageState {
    pub fn from_fetch(result: Result<ImageSet>) -> Self {
        match result {
            Ok(set) => PageState::Ready(set),
            Err(HaloError::NoData) => PageState::Empty,
            Err(err) => PageState::Failed(err.to_string()),
        }
    }

    pub fn image_set(&self) -> Option<&ImageSet> {
        match self {
            PageState::Ready(set) => Some(set),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageState::Failed(_))
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageState::Loading => f.write_str("Loading images..."),
            PageState::Failed(message) => {
                write!(f, "Error Loading Images: {message}")
            }
            PageState::Empty => f.write_str("No data available"),
            PageState::Ready(set) => {
                write!(f, "{} ({} images)", set.name, set.slot_count())
            }
        }
    }
}
