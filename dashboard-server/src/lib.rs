//! HTTP API for the weather dashboard.
//!
//! Exposes the forecast gateway as three JSON endpoints:
//! - `GET /api/weather` for the default city
//! - `GET /api/weather/{city}`
//! - `GET /api/forecast/{city}`

use axum::{Router, routing::get};
use dashboard_core::Gateway;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod error;
mod routes;

pub use error::ApiError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway: Arc::new(gateway) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/weather", get(routes::default_weather))
        .route("/api/weather/:city", get(routes::city_weather))
        .route("/api/forecast/:city", get(routes::city_forecast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
