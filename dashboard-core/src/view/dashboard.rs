use chrono::NaiveDateTime;
use tracing::warn;

use crate::{
    activity::HOURS_PER_DAY,
    city::CityId,
    client::WeatherSource,
    model::{CityForecast, ForecastEnvelope, TemperatureUnit, describe_weather_code},
};

use super::{ChartPoint, Load, RequestToken, bucket_averages};

/// Days covered by the precipitation chart.
pub const DAILY_BUCKETS: usize = 7;

const UPSTREAM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    CityChanged(CityId),
    WeatherLoaded(RequestToken, ForecastEnvelope),
    WeatherFailed(RequestToken),
    ForecastLoaded(RequestToken, CityForecast),
    ForecastFailed(RequestToken),
    UnitToggled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    city: CityId,
    unit: TemperatureUnit,
    token: RequestToken,
    weather: Load<ForecastEnvelope>,
    forecast: Load<CityForecast>,
}

impl DashboardState {
    pub fn new(city: CityId, unit: TemperatureUnit) -> Self {
        Self {
            city,
            unit,
            token: RequestToken::default(),
            weather: Load::Idle,
            forecast: Load::Idle,
        }
    }

    pub fn reduce(self, event: DashboardEvent) -> Self {
        match event {
            DashboardEvent::CityChanged(city) => Self {
                city,
                token: self.token.next(),
                weather: Load::Loading,
                forecast: Load::Loading,
                ..self
            },
            DashboardEvent::WeatherLoaded(token, envelope) if token == self.token => {
                Self { weather: Load::Ready(envelope), ..self }
            }
            DashboardEvent::WeatherFailed(token) if token == self.token => {
                Self { weather: Load::Failed, ..self }
            }
            DashboardEvent::ForecastLoaded(token, forecast) if token == self.token => {
                Self { forecast: Load::Ready(forecast), ..self }
            }
            DashboardEvent::ForecastFailed(token) if token == self.token => {
                Self { forecast: Load::Failed, ..self }
            }
            DashboardEvent::UnitToggled => Self { unit: self.unit.toggled(), ..self },
            // Result of a superseded request.
            _ => self,
        }
    }

    pub fn city(&self) -> CityId {
        self.city
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn weather(&self) -> &Load<ForecastEnvelope> {
        &self.weather
    }

    pub fn forecast(&self) -> &Load<CityForecast> {
        &self.forecast
    }

    /// Current temperature in the selected unit.
    pub fn current_temperature(&self) -> Option<f64> {
        let celsius = self.weather.ready()?.temperature?;
        Some(self.unit.convert(celsius))
    }

    pub fn condition(&self) -> Option<&'static str> {
        self.weather.ready()?.weather_code.map(describe_weather_code)
    }

    pub fn observed_at(&self) -> Option<String> {
        self.weather.ready()?.observed_at().map(hour_label)
    }

    /// Hourly temperatures from the forecast, in the selected unit.
    pub fn temperature_series(&self) -> Vec<ChartPoint> {
        let Some(series) = self.forecast.ready().and_then(CityForecast::hourly_series) else {
            return Vec::new();
        };
        let (Some(times), Some(temps)) = (series.time, series.temperature_2m) else {
            return Vec::new();
        };

        times
            .iter()
            .zip(temps)
            .filter_map(|(time, temp)| {
                let time = time.as_deref()?;
                Some(ChartPoint::new(hour_label(time), self.unit.convert(temp?)))
            })
            .collect()
    }

    /// Mean precipitation probability per day over the hourly series.
    pub fn daily_precipitation(&self) -> Vec<ChartPoint> {
        let Some(series) = self.weather.ready().and_then(ForecastEnvelope::hourly_series) else {
            return Vec::new();
        };
        let Some(precipitation) = series.precipitation_probability.as_deref() else {
            return Vec::new();
        };
        let times = series.time.as_deref().unwrap_or_default();

        bucket_averages(precipitation, HOURS_PER_DAY, DAILY_BUCKETS)
            .into_iter()
            .enumerate()
            .map(|(day, average)| {
                let first_hour = times.get(day * HOURS_PER_DAY).and_then(|t| t.as_deref());
                ChartPoint::new(day_label(day, first_hour), average)
            })
            .collect()
    }

    pub fn activity_link(&self) -> String {
        format!("/activity/{}", self.city)
    }
}

/// `2024-06-01T13:00` → `13:00`; anything else is passed through.
pub fn hour_label(time: &str) -> String {
    NaiveDateTime::parse_from_str(time, UPSTREAM_TIME_FORMAT)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| time.to_string())
}

fn day_label(day: usize, first_hour: Option<&str>) -> String {
    first_hour
        .and_then(|t| NaiveDateTime::parse_from_str(t, UPSTREAM_TIME_FORMAT).ok())
        .map(|dt| dt.format("%a %d").to_string())
        .unwrap_or_else(|| format!("Day {}", day + 1))
}

/// Select `city` and fetch both weather and forecast for it concurrently.
pub async fn load(source: &dyn WeatherSource, state: DashboardState, city: CityId) -> DashboardState {
    let state = state.reduce(DashboardEvent::CityChanged(city));
    let token = state.token();

    let (weather, forecast) =
        tokio::join!(source.weather(city.as_str()), source.forecast(city.as_str()));

    let weather_event = match weather {
        Ok(envelope) => DashboardEvent::WeatherLoaded(token, envelope),
        Err(err) => {
            warn!(%city, error = %err, "failed to load weather");
            DashboardEvent::WeatherFailed(token)
        }
    };
    let forecast_event = match forecast {
        Ok(forecast) => DashboardEvent::ForecastLoaded(token, forecast),
        Err(err) => {
            warn!(%city, error = %err, "failed to load forecast");
            DashboardEvent::ForecastFailed(token)
        }
    };

    state.reduce(weather_event).reduce(forecast_event)
}
