use std::time::Duration;

use halo_model::{ImageSet, ResourceDescriptor};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SOURCE_URL: &str = "http://localhost:3000/api/images";
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry budget the status texts are written against.
pub const EXPECTED_MAX_RETRIES: u32 = halo_model::MAX_RETRIES as u32;

/// Served when no `[image_set]` section is configured. The third image is
/// flagged by the backend so the error path is visible out of the box.
pub fn default_image_set() -> ImageSet {
    ImageSet::new(
        "Super 30",
        vec![
            ResourceDescriptor::ready(
                "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?w=200&h=200&fit=crop",
            ),
            ResourceDescriptor::ready(
                "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=200&h=200&fit=crop",
            ),
            ResourceDescriptor::flagged(
                "https://picsum.photos/seed/error/200/200",
            ),
            ResourceDescriptor::ready(
                "https://images.unsplash.com/photo-1580013759032-c96505e24c1f?w=200&h=200&fit=crop",
            ),
        ],
    )
}
