use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Fixed latitude/longitude pair for a supported city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions plus the full upstream payload, as served by `/api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<i64>,
    pub full_data: Value,
}

impl ForecastEnvelope {
    /// Typed view over `fullData.hourly`, if present and well-formed.
    pub fn hourly_series(&self) -> Option<HourlySeries> {
        self.full_data.get("hourly").and_then(|h| HourlySeries::deserialize(h).ok())
    }

    /// Upstream observation time of the current conditions (`current.time`).
    pub fn observed_at(&self) -> Option<&str> {
        self.full_data.get("current")?.get("time")?.as_str()
    }
}

/// Hourly-only forecast for one day, as served by `/api/forecast/{city}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityForecast {
    pub city: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub hourly: Value,
}

impl CityForecast {
    pub fn hourly_series(&self) -> Option<HourlySeries> {
        HourlySeries::deserialize(&self.hourly).ok()
    }
}

/// Parallel hourly sequences sharing one hour index.
///
/// Any sequence may be missing from the upstream payload, and the upstream
/// uses `null` for individual hours it has no value for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_2m: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m: Option<Vec<Option<f64>>>,
}

impl HourlySeries {
    fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        [
            self.time.as_ref().map(Vec::len),
            self.temperature_2m.as_ref().map(Vec::len),
            self.precipitation_probability.as_ref().map(Vec::len),
            self.wind_speed_10m.as_ref().map(Vec::len),
        ]
        .into_iter()
        .flatten()
    }

    /// Number of hours covered by the longest present sequence.
    pub fn len(&self) -> usize {
        self.lengths().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every present sequence has the same length.
    pub fn is_aligned(&self) -> bool {
        let mut lengths = self.lengths();
        match lengths.next() {
            Some(first) => lengths.all(|len| len == first),
            None => true,
        }
    }

    /// Values of the hour at `index`.
    ///
    /// Returns `None` when the time, temperature or precipitation value is
    /// missing; a missing wind value is kept as `None` in the reading.
    pub fn reading(&self, index: usize) -> Option<HourReading> {
        let time = self.time.as_ref()?.get(index)?.clone()?;
        let temperature = value_at(&self.temperature_2m, index)?;
        let precipitation_probability = value_at(&self.precipitation_probability, index)?;
        let wind_speed = value_at(&self.wind_speed_10m, index);

        Some(HourReading { time, temperature, precipitation_probability, wind_speed })
    }
}

fn value_at(series: &Option<Vec<Option<f64>>>, index: usize) -> Option<f64> {
    series.as_ref()?.get(index).copied().flatten()
}

/// One hour of weather, as far as the activity evaluator cares.
#[derive(Debug, Clone, PartialEq)]
pub struct HourReading {
    pub time: String,
    /// °C
    pub temperature: f64,
    /// %
    pub precipitation_probability: f64,
    /// km/h
    pub wind_speed: Option<f64>,
}

/// Display unit for temperatures. Upstream data is always Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown temperature unit '{0}'. Use 'celsius' or 'fahrenheit'.")]
pub struct ParseUnitError(pub String);

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(ParseUnitError(s.to_string())),
        }
    }
}

pub fn convert_temp(celsius: f64, unit: TemperatureUnit) -> f64 {
    unit.convert(celsius)
}

/// Human-readable description of a WMO weather interpretation code.
/// See: https://open-meteo.com/en/docs#weathervariables
pub fn describe_weather_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 => "Rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 | 77 => "Snow",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
