use axum::{Router, routing::get};

use crate::{handlers::images::get_images_handler, infra::app_state::AppState};

/// Routes mounted under `/api`.
pub fn create_api_router() -> Router<AppState> {
    Router::new().route("/images", get(get_images_handler))
}
