use std::{fmt, sync::Arc};

use halo_config::Config;
use halo_model::ImageSet;

#[derive(Clone)]
pub struct AppState {
    image_set: Arc<ImageSet>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("image_set", &self.image_set.name)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(image_set: ImageSet) -> Self {
        Self {
            image_set: Arc::new(image_set),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.image_set.clone())
    }

    pub fn image_set(&self) -> &ImageSet {
        &self.image_set
    }
}
