use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::{MalformedRecordPolicy, ThresholdConfig};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const DEFAULT_OUTPUT_DIR: &str = "data/processed";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// cities = ["Sydney", "Perth"]
/// default_city = "Sydney"
/// malformed_records = "skip"
///
/// [thresholds]
/// sunny_temp_threshold = 25.0
/// rainy_min_temp_threshold = 10.0
/// rainy_humidity_threshold = 80.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Cities offered by the selector.
    pub cities: Vec<String>,

    pub default_city: Option<String>,

    /// Where CSV files are written; `data/processed` when unset.
    pub output_dir: Option<PathBuf>,

    pub malformed_records: MalformedRecordPolicy,

    pub thresholds: ThresholdConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            cities: ["Sydney", "Melbourne", "Brisbane", "Perth", "Adelaide"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_city: None,
            output_dir: None,
            malformed_records: MalformedRecordPolicy::default(),
            thresholds: ThresholdConfig {
                sunny_temp_threshold: 25.0,
                rainy_min_temp_threshold: 10.0,
                rainy_humidity_threshold: 80.0,
            },
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    /// A non-empty `OPENWEATHER_API_KEY` replaces the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            cfg.api_key = Some(key);
        }

        Ok(cfg)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file.
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

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast-stats", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Add a city to the selector list (case-insensitive dedupe) and make it
    /// the default if none is set.
    pub fn add_city(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        if !self.cities.iter().any(|c| c.eq_ignore_ascii_case(city)) {
            self.cities.push(city.to_string());
        }

        if self.default_city.is_none() {
            self.default_city = Some(city.to_string());
        }
    }

    pub fn set_default_city(&mut self, city: &str) {
        self.add_city(city);
        self.default_city = Some(city.trim().to_string());
    }

    /// The explicit default city, else the first listed one.
    pub fn default_city(&self) -> Result<&str> {
        self.default_city
            .as_deref()
            .or_else(|| self.cities.first().map(String::as_str))
            .ok_or_else(|| {
                anyhow!(
                    "No city configured.\n\
                     Hint: pass a city (e.g. `forecast show Sydney`) or run `forecast configure`."
                )
            })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_dashboard_thresholds() {
        let cfg = Config::default();

        assert_eq!(cfg.thresholds.sunny_temp_threshold, 25.0);
        assert_eq!(cfg.thresholds.rainy_min_temp_threshold, 10.0);
        assert_eq!(cfg.thresholds.rainy_humidity_threshold, 80.0);
        assert_eq!(cfg.malformed_records, MalformedRecordPolicy::Abort);
        assert_eq!(cfg.output_dir(), PathBuf::from("data/processed"));
    }

    #[test]
    fn default_city_falls_back_to_first_listed() {
        let cfg = Config::default();
        assert_eq!(cfg.default_city().unwrap(), "Sydney");
    }

    #[test]
    fn default_city_errors_when_nothing_configured() {
        let cfg = Config {
            cities: Vec::new(),
            ..Config::default()
        };

        let err = cfg.default_city().unwrap_err();
        assert!(err.to_string().contains("No city configured"));
    }

    #[test]
    fn add_city_dedupes_and_does_not_override_default() {
        let mut cfg = Config {
            cities: Vec::new(),
            ..Config::default()
        };

        cfg.add_city("Hobart");
        cfg.add_city("hobart");
        cfg.add_city("Darwin");

        assert_eq!(cfg.cities, vec!["Hobart", "Darwin"]);
        assert_eq!(cfg.default_city().unwrap(), "Hobart");
    }

    #[test]
    fn set_default_city_overrides_default() {
        let mut cfg = Config::default();

        cfg.set_default_city("Darwin");

        assert_eq!(cfg.default_city().unwrap(), "Darwin");
        assert!(cfg.cities.iter().any(|c| c == "Darwin"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());

        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_default_city("Perth");
        cfg.malformed_records = MalformedRecordPolicy::Skip;
        cfg.thresholds.sunny_temp_threshold = 28.0;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key(), Some("KEY"));
        assert_eq!(loaded.default_city().unwrap(), "Perth");
        assert_eq!(loaded.malformed_records, MalformedRecordPolicy::Skip);
        assert_eq!(loaded.thresholds.sunny_temp_threshold, 28.0);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_city = \"Brisbane\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.default_city().unwrap(), "Brisbane");
        assert_eq!(cfg.thresholds.rainy_humidity_threshold, 80.0);
        assert_eq!(cfg.cities.len(), 5);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert!(cfg.api_key().is_none());
    }
}
