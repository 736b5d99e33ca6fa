use axum::{Json, extract::State};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

/// Client-facing message for any failure to serve the image set.
pub const FETCH_FAILED: &str = "Failed to fetch images";

/// Serve the configured image set document.
pub async fn get_images_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let set = state.image_set();
    let body = serde_json::to_value(set).map_err(|err| {
        error!(error = %err, "failed to encode image set");
        AppError::internal(FETCH_FAILED)
    })?;

    debug!(name = %set.name, images = set.slot_count(), "serving image set");
    Ok(Json(body))
}
