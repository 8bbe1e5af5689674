use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One weather entry as returned by the provider, for both the current
/// weather endpoint and each item of the forecast `list`.
///
/// Only the fields the pipeline reads are declared; everything else in the
/// provider payload is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWeatherRecord {
    /// Unix timestamp, seconds.
    pub dt: i64,
    pub main: RawMain,
    pub wind: RawWind,
    pub weather: Vec<RawDescription>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMain {
    /// Temperature in Kelvin.
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDescription {
    pub description: String,
}

/// A weather observation in the internal fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed: f64,
    pub description: String,
}

/// Min/max statistics for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub min_humidity_pct: f64,
    pub max_humidity_pct: f64,
    pub min_wind_speed: f64,
    pub max_wind_speed: f64,
}

/// Caller-supplied classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub sunny_temp_threshold: f64,
    pub rainy_min_temp_threshold: f64,
    pub rainy_humidity_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCategory {
    Sunny,
    Rainy,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
}

impl WeatherCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCategory::Sunny => "Sunny",
            WeatherCategory::Rainy => "Rainy",
            WeatherCategory::PartlyCloudy => "Partly Cloudy",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A daily row paired with the category derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedDay {
    pub stats: DailyStats,
    pub category: WeatherCategory,
}

/// What to do with a forecast entry that fails schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRecordPolicy {
    /// Fail the whole forecast batch.
    #[default]
    Abort,
    /// Drop the entry and keep going.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_matches_labels() {
        let labels: Vec<String> = [
            WeatherCategory::Sunny,
            WeatherCategory::Rainy,
            WeatherCategory::PartlyCloudy,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        assert_eq!(labels, ["Sunny", "Rainy", "Partly Cloudy"]);
    }

    #[test]
    fn category_serializes_with_spaced_label() {
        let json = serde_json::to_string(&WeatherCategory::PartlyCloudy).unwrap();
        assert_eq!(json, "\"Partly Cloudy\"");
    }

    #[test]
    fn raw_record_ignores_extra_provider_fields() {
        let value = serde_json::json!({
            "dt": 1_700_000_000,
            "main": { "temp": 290.0, "feels_like": 289.0, "humidity": 55 },
            "wind": { "speed": 3.2, "deg": 180 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky" }],
            "visibility": 10000
        });

        let raw: RawWeatherRecord = serde_json::from_value(value).unwrap();
        assert_eq!(raw.main.humidity, 55.0);
        assert_eq!(raw.weather[0].description, "clear sky");
    }
}
