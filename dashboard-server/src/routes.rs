use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use dashboard_core::{CityForecast, ForecastEnvelope};
use tracing::info;

use crate::{AppState, error::ApiError};

pub async fn default_weather(
    State(state): State<AppState>,
) -> Result<Json<ForecastEnvelope>, ApiError> {
    info!(city = %state.gateway.default_city(), "GET /api/weather");

    state.gateway.get_default_weather().await.map(Json).map_err(ApiError::weather)
}

pub async fn city_weather(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<ForecastEnvelope>, ApiError> {
    let Path(city) = city.map_err(ApiError::weather_path)?;
    info!(%city, "GET /api/weather/{{city}}");

    state.gateway.get_weather(&city).await.map(Json).map_err(ApiError::weather)
}

pub async fn city_forecast(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<CityForecast>, ApiError> {
    let Path(city) = city.map_err(ApiError::forecast_path)?;
    info!(%city, "GET /api/forecast/{{city}}");

    state.gateway.get_forecast(&city).await.map(Json).map_err(ApiError::forecast)
}
