use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    city::CityId, model::TemperatureUnit, pagination::DEFAULT_ITEMS_PER_PAGE,
    provider::openmeteo::OPEN_METEO_URL,
};

/// Where the HTTP API listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen: "127.0.0.1:3000".to_string() }
    }
}

/// Forecast provider endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// No timeout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { base_url: OPEN_METEO_URL.to_string(), timeout_secs: None }
    }
}

/// Front-end preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_city: CityId,
    pub unit: TemperatureUnit,
    pub items_per_page: usize,
    /// Base URL of a running dashboard server. When unset the CLI talks to
    /// the forecast provider directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_city: CityId::default(),
            unit: TemperatureUnit::default(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            api_url: None,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [server]
/// listen = "127.0.0.1:3000"
///
/// [dashboard]
/// default_city = "paris"
/// unit = "fahrenheit"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load config from the platform config directory, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_open_meteo_and_berlin() {
        let cfg = Config::default();

        assert_eq!(cfg.upstream.base_url, OPEN_METEO_URL);
        assert_eq!(cfg.upstream.timeout_secs, None);
        assert_eq!(cfg.dashboard.default_city, CityId::Berlin);
        assert_eq!(cfg.dashboard.unit, TemperatureUnit::Celsius);
        assert_eq!(cfg.dashboard.items_per_page, 6);
        assert_eq!(cfg.server.listen, "127.0.0.1:3000");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [dashboard]
            default_city = "tokyo"
            items_per_page = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.dashboard.default_city, CityId::Tokyo);
        assert_eq!(cfg.dashboard.items_per_page, 5);
        assert_eq!(cfg.dashboard.unit, TemperatureUnit::Celsius);
        assert_eq!(cfg.server, ServerConfig::default());
    }

    #[test]
    fn unknown_city_in_toml_is_rejected() {
        let res: Result<Config, _> = toml::from_str("[dashboard]\ndefault_city = \"atlantis\"\n");
        assert!(res.is_err());
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_to_then_load_from_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.dashboard.unit = TemperatureUnit::Fahrenheit;
        cfg.dashboard.api_url = Some("http://127.0.0.1:3000".into());
        cfg.upstream.timeout_secs = Some(10);

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dashboard\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
