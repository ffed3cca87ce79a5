use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};

use crate::model::CityCoordinate;

/// Cities the dashboard knows coordinates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityId {
    #[default]
    Berlin,
    London,
    Paris,
    NewYork,
    Tokyo,
}

/// Returned when a city identifier is not in the static table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown city '{0}'. Supported cities: berlin, london, paris, newyork, tokyo.")]
pub struct UnknownCity(pub String);

impl CityId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CityId::Berlin => "berlin",
            CityId::London => "london",
            CityId::Paris => "paris",
            CityId::NewYork => "newyork",
            CityId::Tokyo => "tokyo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CityId::Berlin => "Berlin",
            CityId::London => "London",
            CityId::Paris => "Paris",
            CityId::NewYork => "New York",
            CityId::Tokyo => "Tokyo",
        }
    }

    pub const fn all() -> &'static [CityId] {
        &[CityId::Berlin, CityId::London, CityId::Paris, CityId::NewYork, CityId::Tokyo]
    }

    pub fn coordinate(&self) -> CityCoordinate {
        let (latitude, longitude) = match self {
            CityId::Berlin => (52.52, 13.41),
            CityId::London => (51.51, -0.13),
            CityId::Paris => (48.85, 2.35),
            CityId::NewYork => (40.71, -74.01),
            CityId::Tokyo => (35.68, 139.69),
        };

        CityCoordinate { latitude, longitude }
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CityId {
    type Error = UnknownCity;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "berlin" => Ok(CityId::Berlin),
            "london" => Ok(CityId::London),
            "paris" => Ok(CityId::Paris),
            "newyork" => Ok(CityId::NewYork),
            "tokyo" => Ok(CityId::Tokyo),
            _ => Err(UnknownCity(value.to_string())),
        }
    }
}

impl FromStr for CityId {
    type Err = UnknownCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CityId::try_from(s)
    }
}

/// Resolve a city identifier (any case) to its coordinates.
pub fn lookup(city: &str) -> Option<CityCoordinate> {
    CityId::try_from(city).ok().map(|id| id.coordinate())
}
