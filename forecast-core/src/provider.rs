use crate::Config;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherFetcher;

/// Source of raw weather records for a city.
///
/// Records are returned as opaque JSON values; shape validation is the
/// normalizer's job.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn current(&self, city: &str) -> anyhow::Result<Value>;

    async fn forecast(&self, city: &str) -> anyhow::Result<Vec<Value>>;
}

/// Construct the OpenWeather fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherFetcher>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `forecast configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    Ok(Box::new(OpenWeatherFetcher::new(api_key.to_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();

        let err = fetcher_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn fetcher_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(fetcher_from_config(&cfg).is_ok());
    }
}
