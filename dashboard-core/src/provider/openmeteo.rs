use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::UpstreamError;

use super::{UpstreamQuery, WeatherProvider};

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self { base_url: base_url.into(), http: builder.build()? })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Query string parameters for one upstream request.
pub fn query_params(query: &UpstreamQuery) -> Vec<(&'static str, String)> {
    let coord = query.coordinate();
    let mut params = vec![
        ("latitude", coord.latitude.to_string()),
        ("longitude", coord.longitude.to_string()),
    ];

    match query {
        UpstreamQuery::Weather(_) => {
            params.push(("current", "temperature_2m,weather_code".to_string()));
            params.push((
                "hourly",
                "temperature_2m,precipitation_probability,wind_speed_10m".to_string(),
            ));
            params.push(("timezone", "auto".to_string()));
        }
        UpstreamQuery::Forecast(_) => {
            params.push(("hourly", "temperature_2m".to_string()));
            params.push(("forecast_days", "1".to_string()));
        }
    }

    params
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Value, UpstreamError> {
        let params = query_params(query);
        debug!(url = %self.base_url, ?params, "requesting Open-Meteo forecast");

        let res = self.http.get(&self.base_url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
