//! Forecast gateway: city lookup, one upstream call, reshape.
//!
//! Both modes resolve the city first, issue a single request through the
//! configured [`WeatherProvider`] and never retry. The upstream payload is
//! checked against the shape the views rely on before it is handed out, so
//! a provider change surfaces here as [`GatewayError::UpstreamSchema`]
//! instead of as missing values further down.

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::{
    city::CityId,
    config::Config,
    error::GatewayError,
    model::{CityForecast, ForecastEnvelope, HourlySeries},
    provider::{OpenMeteoProvider, UpstreamQuery, WeatherProvider},
};

#[derive(Debug, Clone)]
pub struct Gateway {
    provider: Arc<dyn WeatherProvider>,
    default_city: CityId,
}

impl Gateway {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider, default_city: CityId::default() }
    }

    pub fn with_default_city(mut self, city: CityId) -> Self {
        self.default_city = city;
        self
    }

    /// Build a gateway backed by Open-Meteo using the `[upstream]` and
    /// `[dashboard]` sections of the config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = config.upstream.timeout_secs.map(Duration::from_secs);
        let provider = OpenMeteoProvider::new(config.upstream.base_url.clone(), timeout)
            .context("Failed to build HTTP client for the forecast provider")?;

        Ok(Self::new(Arc::new(provider)).with_default_city(config.dashboard.default_city))
    }

    pub fn default_city(&self) -> CityId {
        self.default_city
    }

    /// Current conditions plus the full hourly payload for `city`.
    pub async fn get_weather(&self, city: &str) -> Result<ForecastEnvelope, GatewayError> {
        let id = CityId::try_from(city)?;
        self.weather_for(id).await
    }

    /// Same as [`Gateway::get_weather`] for the configured default city.
    pub async fn get_default_weather(&self) -> Result<ForecastEnvelope, GatewayError> {
        self.weather_for(self.default_city).await
    }

    /// One day of hourly temperatures for `city`.
    pub async fn get_forecast(&self, city: &str) -> Result<CityForecast, GatewayError> {
        let id = CityId::try_from(city)?;
        let payload = self.fetch(id, UpstreamQuery::Forecast(id.coordinate())).await?;

        reshape_forecast(city, payload)
    }

    async fn weather_for(&self, id: CityId) -> Result<ForecastEnvelope, GatewayError> {
        let payload = self.fetch(id, UpstreamQuery::Weather(id.coordinate())).await?;

        reshape_weather(payload)
    }

    async fn fetch(&self, id: CityId, query: UpstreamQuery) -> Result<Value, GatewayError> {
        info!(city = %id, ?query, "fetching from forecast provider");

        self.provider.fetch(&query).await.map_err(|err| {
            warn!(city = %id, error = %err, "forecast provider request failed");
            GatewayError::Upstream(err)
        })
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamPayload {
    #[serde(default)]
    current: Option<CurrentBlock>,
    #[serde(default)]
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    #[serde(default)]
    temperature_2m: Option<f64>,
    #[serde(default)]
    weather_code: Option<i64>,
}

fn validate(payload: &Value) -> Result<UpstreamPayload, GatewayError> {
    if !payload.is_object() {
        return Err(GatewayError::UpstreamSchema("payload is not a JSON object".into()));
    }

    let parsed = UpstreamPayload::deserialize(payload)
        .map_err(|e| GatewayError::UpstreamSchema(e.to_string()))?;

    if let Some(hourly) = &parsed.hourly {
        if !hourly.is_aligned() {
            return Err(GatewayError::UpstreamSchema(
                "hourly sequences have different lengths".into(),
            ));
        }
    }

    Ok(parsed)
}

/// Lift the current conditions to the top level and keep the payload verbatim.
pub fn reshape_weather(payload: Value) -> Result<ForecastEnvelope, GatewayError> {
    let parsed = validate(&payload)?;
    let current = parsed.current;

    Ok(ForecastEnvelope {
        temperature: current.as_ref().and_then(|c| c.temperature_2m),
        weather_code: current.as_ref().and_then(|c| c.weather_code),
        full_data: payload,
    })
}

pub fn reshape_forecast(city: &str, mut payload: Value) -> Result<CityForecast, GatewayError> {
    validate(&payload)?;

    let hourly = payload.get_mut("hourly").map(Value::take).unwrap_or(Value::Null);

    Ok(CityForecast { city: city.to_string(), hourly })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::UpstreamError, model::CityCoordinate};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays one canned response and records every query it receives.
    #[derive(Debug)]
    struct StubProvider {
        response: Mutex<Option<Result<Value, UpstreamError>>>,
        queries: Mutex<Vec<UpstreamQuery>>,
    }

    impl StubProvider {
        fn ok(body: Value) -> Arc<Self> {
            Arc::new(Self { response: Mutex::new(Some(Ok(body))), queries: Mutex::default() })
        }

        fn failing(status: u16) -> Arc<Self> {
            let err = UpstreamError::Status { status, body: String::new() };
            Arc::new(Self { response: Mutex::new(Some(Err(err))), queries: Mutex::default() })
        }

        fn queries(&self) -> Vec<UpstreamQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch(&self, query: &UpstreamQuery) -> Result<Value, UpstreamError> {
            self.queries.lock().unwrap().push(*query);
            self.response.lock().unwrap().take().expect("stub called more than once")
        }
    }

    fn sample_payload() -> Value {
        json!({
            "latitude": 52.52,
            "longitude": 13.419998,
            "timezone": "Europe/Berlin",
            "current": { "time": "2024-06-01T12:00", "temperature_2m": 21.4, "weather_code": 2 },
            "hourly_units": { "temperature_2m": "°C" },
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "temperature_2m": [15.2, 14.8],
                "precipitation_probability": [0, 5],
                "wind_speed_10m": [7.9, 8.3]
            }
        })
    }

    #[tokio::test]
    async fn get_weather_lifts_current_conditions_and_keeps_payload() {
        let stub = StubProvider::ok(sample_payload());
        let gateway = Gateway::new(stub.clone());

        let envelope = gateway.get_weather("Berlin").await.unwrap();

        assert_eq!(envelope.temperature, Some(21.4));
        assert_eq!(envelope.weather_code, Some(2));
        assert_eq!(envelope.full_data, sample_payload());
        assert_eq!(
            stub.queries(),
            vec![UpstreamQuery::Weather(CityCoordinate { latitude: 52.52, longitude: 13.41 })]
        );
    }

    #[tokio::test]
    async fn get_weather_rejects_unknown_city_without_calling_upstream() {
        let stub = StubProvider::ok(sample_payload());
        let gateway = Gateway::new(stub.clone());

        let err = gateway.get_weather("atlantis").await.unwrap_err();

        assert!(err.is_client_error());
        assert!(stub.queries().is_empty());
    }

    #[tokio::test]
    async fn get_weather_maps_provider_failure() {
        let gateway = Gateway::new(StubProvider::failing(503));
        let err = gateway.get_weather("paris").await.unwrap_err();

        assert!(matches!(err, GatewayError::Upstream(UpstreamError::Status { status: 503, .. })));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn get_default_weather_uses_configured_city() {
        let stub = StubProvider::ok(sample_payload());
        let gateway = Gateway::new(stub.clone()).with_default_city(CityId::Tokyo);

        gateway.get_default_weather().await.unwrap();

        assert_eq!(stub.queries(), vec![UpstreamQuery::Weather(CityId::Tokyo.coordinate())]);
    }

    #[tokio::test]
    async fn get_forecast_returns_city_and_hourly_block() {
        let stub = StubProvider::ok(json!({
            "hourly": { "time": ["2024-06-01T00:00"], "temperature_2m": [12.0] }
        }));
        let gateway = Gateway::new(stub.clone());

        let forecast = gateway.get_forecast("London").await.unwrap();

        assert_eq!(forecast.city, "London");
        assert_eq!(forecast.hourly["temperature_2m"], json!([12.0]));
        assert_eq!(stub.queries(), vec![UpstreamQuery::Forecast(CityId::London.coordinate())]);
    }

    #[test]
    fn reshape_weather_tolerates_missing_current_block() {
        let envelope = reshape_weather(json!({ "hourly": { "time": [] } })).unwrap();
        assert_eq!(envelope.temperature, None);
        assert_eq!(envelope.weather_code, None);
    }

    #[test]
    fn reshape_rejects_non_object_payload() {
        let err = reshape_weather(json!([1, 2])).unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamSchema(_)));
    }

    #[test]
    fn reshape_rejects_wrongly_typed_fields() {
        let err = reshape_weather(json!({ "current": { "temperature_2m": "warm" } })).unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamSchema(_)));

        let err = reshape_forecast("berlin", json!({ "hourly": { "time": "now" } })).unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamSchema(_)));
    }

    #[test]
    fn reshape_rejects_misaligned_hourly_sequences() {
        let err = reshape_weather(json!({
            "hourly": { "time": ["a", "b"], "temperature_2m": [1.0] }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("different lengths"));
    }
}
