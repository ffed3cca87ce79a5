//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - The static city table and the forecast gateway over Open-Meteo
//! - The outdoor activity evaluator and page navigation
//! - Reducer-style state for the dashboard and activity views
//! - Configuration handling
//!
//! It is used by `dashboard-server` and `dashboard-cli`.

pub mod activity;
pub mod city;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod pagination;
pub mod provider;
pub mod view;

pub use city::{CityId, UnknownCity, lookup};
pub use client::{ApiClient, WeatherSource};
pub use config::Config;
pub use error::{GatewayError, UpstreamError};
pub use gateway::Gateway;
pub use model::{
    CityCoordinate, CityForecast, ForecastEnvelope, HourReading, HourlySeries, TemperatureUnit,
    convert_temp,
};
pub use pagination::{Direction, PageState};
pub use provider::{OpenMeteoProvider, WeatherProvider};
