use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dashboard_core::GatewayError;
use serde_json::json;
use tracing::warn;

/// Error body returned to API clients: `{"error": "<message>"}`.
///
/// Messages are fixed per endpoint; upstream details only go to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    fn from_gateway(err: &GatewayError, invalid_city: &'static str, failed: &'static str) -> Self {
        if err.is_client_error() {
            Self { status: StatusCode::BAD_REQUEST, message: invalid_city }
        } else {
            warn!(error = %err, "gateway request failed");
            Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: failed }
        }
    }

    pub fn weather(err: GatewayError) -> Self {
        Self::from_gateway(&err, "City not supported", "Failed to fetch weather data")
    }

    pub fn forecast(err: GatewayError) -> Self {
        Self::from_gateway(&err, "Invalid city", "Failed to fetch forecast")
    }

    /// A city segment that does not even decode is an unknown city.
    pub fn weather_path(rejection: PathRejection) -> Self {
        warn!(error = %rejection, "rejected city path");
        Self { status: StatusCode::BAD_REQUEST, message: "City not supported" }
    }

    pub fn forecast_path(rejection: PathRejection) -> Self {
        warn!(error = %rejection, "rejected city path");
        Self { status: StatusCode::BAD_REQUEST, message: "Invalid city" }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
