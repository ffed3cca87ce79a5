use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{error::UpstreamError, model::CityCoordinate};

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// What the gateway asks the upstream provider for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpstreamQuery {
    /// Current temperature and weather code plus hourly temperature,
    /// precipitation probability and wind speed, in the local timezone.
    Weather(CityCoordinate),
    /// Hourly temperature for a single day.
    Forecast(CityCoordinate),
}

impl UpstreamQuery {
    pub fn coordinate(&self) -> CityCoordinate {
        match self {
            UpstreamQuery::Weather(c) | UpstreamQuery::Forecast(c) => *c,
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Issue exactly one upstream request and return the parsed JSON body.
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Value, UpstreamError>;
}
