use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::units::TemperatureUnit;

/// Remote API base URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
        }
    }
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// unit = "fahrenheit"
/// timeout_secs = 10
///
/// [endpoints]
/// forecast_url = "https://api.open-meteo.com/v1"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display unit; snapshots are always stored in Celsius.
    #[serde(default)]
    pub unit: TemperatureUnit,

    /// Upper bound for every remote call.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            timeout_secs: default_timeout(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weathernow", "weathernow")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for the recency list, accounts and the session token.
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_open_meteo() {
        let cfg = Config::default();
        assert_eq!(cfg.unit, TemperatureUnit::Celsius);
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.endpoints.geocoding_url, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(cfg.endpoints.forecast_url, "https://api.open-meteo.com/v1");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("unit = \"fahrenheit\"\n").expect("valid toml");
        assert_eq!(cfg.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cfg = Config { timeout_secs: 0, ..Config::default() };
        assert_eq!(cfg.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cfg").join("config.toml");

        let mut cfg = Config::default();
        cfg.unit = TemperatureUnit::Fahrenheit;
        cfg.timeout_secs = 3;
        cfg.save_to(&path).expect("save");

        assert_eq!(Config::load_from(&path).expect("load"), cfg);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "unit = \"kelvin\"").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
