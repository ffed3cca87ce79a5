//! Where the views get their data from: the HTTP API of a running
//! dashboard server, or the gateway in-process.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::{
    gateway::Gateway,
    model::{CityForecast, ForecastEnvelope},
};

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn weather(&self, city: &str) -> Result<ForecastEnvelope>;

    async fn forecast(&self, city: &str) -> Result<CityForecast>;
}

#[async_trait]
impl WeatherSource for Gateway {
    async fn weather(&self, city: &str) -> Result<ForecastEnvelope> {
        Ok(self.get_weather(city).await?)
    }

    async fn forecast(&self, city: &str) -> Result<CityForecast> {
        Ok(self.get_forecast(city).await?)
    }
}

/// Client for the `/api/weather/{city}` and `/api/forecast/{city}` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API URL: {base_url}"))?;

        if base_url.cannot_be_a_base() {
            bail!("Invalid API URL: {base_url}");
        }

        Ok(Self { base_url, http: Client::new() })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid API URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            bail!("Request to {url} failed with status {status}: {body}");
        }

        res.json().await.with_context(|| format!("Failed to parse response from {url}"))
    }
}

#[async_trait]
impl WeatherSource for ApiClient {
    async fn weather(&self, city: &str) -> Result<ForecastEnvelope> {
        let url = self.endpoint(&["api", "weather", city])?;
        self.get_json(url).await
    }

    async fn forecast(&self, city: &str) -> Result<CityForecast> {
        let url = self.endpoint(&["api", "forecast", city])?;
        self.get_json(url).await
    }
}
