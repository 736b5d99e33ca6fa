#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Number of positions rendered by the circular avatar arrangement.
pub const CLUSTER_POSITIONS: usize = 4;

/// Externally owned metadata for one slot of the cluster.
///
/// `ready == false` means the resource is intentionally absent or not yet
/// provisioned; `known_error == true` means the backend already flagged it as
/// broken, independent of any load outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceDescriptor {
    #[cfg_attr(feature = "serde", serde(rename = "url"))]
    pub locator: String,
    pub ready: bool,
    #[cfg_attr(feature = "serde", serde(rename = "error", default))]
    pub known_error: bool,
}

impl ResourceDescriptor {
    /// A provisioned resource with no backend error.
    pub fn ready(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            ready: true,
            known_error: false,
        }
    }

    /// A resource that has not been provisioned yet.
    pub fn not_ready(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            ready: false,
            known_error: false,
        }
    }

    /// A resource the backend has flagged as broken.
    pub fn flagged(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            ready: true,
            known_error: true,
        }
    }

    /// Whether a client should try to load this resource at all.
    pub fn is_loadable(&self) -> bool {
        self.ready && !self.known_error
    }
}

/// The document served by the descriptor endpoint.
///
/// `count` is informational; consumers operate on `images.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageSet {
    pub name: String,
    pub count: u32,
    pub images: Vec<ResourceDescriptor>,
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "locationText",
            default,
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub location: Option<String>,
}

impl ImageSet {
    /// Build a set whose `count` mirrors the number of images.
    pub fn new(
        name: impl Into<String>,
        images: Vec<ResourceDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            // Saturates so an oversized payload reads as a count mismatch.
            count: u32::try_from(images.len()).unwrap_or(u32::MAX),
            images,
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn slot_count(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` when the advertised `count` disagrees with the payload.
    pub fn count_mismatch(&self) -> bool {
        usize::try_from(self.count) != Ok(self.images.len())
    }

    /// Reject descriptors that ask to be loaded but carry no locator.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidImageSet(
                "name must not be empty".into(),
            ));
        }
        for (index, image) in self.images.iter().enumerate() {
            if image.is_loadable() && image.locator.trim().is_empty() {
                return Err(ModelError::EmptyLocator { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_loadable_image_without_locator() {
        let set = ImageSet::new(
            "Super 30",
            vec![
                ResourceDescriptor::ready("https://a"),
                ResourceDescriptor::ready(" "),
            ],
        );
        assert_eq!(
            set.validate(),
            Err(ModelError::EmptyLocator { index: 1 })
        );
    }

    #[test]
    fn validate_allows_unprovisioned_image_without_locator() {
        let set = ImageSet::new(
            "Super 30",
            vec![
                ResourceDescriptor::not_ready(""),
                ResourceDescriptor::flagged(""),
            ],
        );
        assert!(set.validate().is_ok());
    }

    #[test]
    fn count_mismatch_tracks_payload_length() {
        let mut set = ImageSet::new("x", vec![ResourceDescriptor::ready("u")]);
        assert!(!set.count_mismatch());
        set.count = 4;
        assert!(set.count_mismatch());
    }

    #[test]
    fn new_advertises_payload_length() {
        let images = vec![
            ResourceDescriptor::ready("a"),
            ResourceDescriptor::not_ready("b"),
            ResourceDescriptor::flagged("c"),
        ];
        let set = ImageSet::new("x", images);
        assert_eq!(set.count, 3);
        assert_eq!(set.slot_count(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_wire_names() {
        let raw = r#"{
            "name": "Super 30",
            "count": 2,
            "images": [
                { "url": "https://a", "ready": true, "error": false },
                { "url": "https://b", "ready": true, "error": true }
            ]
        }"#;
        let set: ImageSet =
            serde_json::from_str(raw).expect("valid image set");
        assert_eq!(set.images[0], ResourceDescriptor::ready("https://a"));
        assert_eq!(set.images[1], ResourceDescriptor::flagged("https://b"));
        assert_eq!(set.location, None);

        let encoded = serde_json::to_value(&set).expect("serializable");
        assert_eq!(encoded["images"][1]["error"], true);
        assert!(encoded.get("locationText").is_none());
    }
}
