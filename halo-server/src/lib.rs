//! # Halo Server
//!
//! Serves the image set document at `GET /api/images` and provides the
//! `watch` client, which fetches that document and prints the cluster status
//! while the images load.

#![allow(missing_docs)]

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;
pub mod watch;

pub use errors::{AppError, AppResult};
pub use infra::app_state::AppState;

use axum::{Router, http::Method, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use handlers::health::health_handler;

/// Build the router: health check plus the image set endpoint.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api", routes::create_api_router())
        .fallback(|| async { AppError::not_found("Not found") })
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
