use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::WeatherFetcher;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeatherMap free-tier API. Temperatures come back in Kelvin since no
/// `units` parameter is sent.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherFetcher {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json(&self, endpoint: &str, city: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, city, "requesting OpenWeather data");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn current(&self, city: &str) -> Result<Value> {
        self.get_json("weather", city).await
    }

    async fn forecast(&self, city: &str) -> Result<Vec<Value>> {
        let mut body = self.get_json("forecast", city).await?;

        match body.get_mut("list").map(Value::take) {
            Some(Value::Array(list)) => Ok(list),
            _ => Err(anyhow!("OpenWeather forecast response has no `list` array")),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry(dt: i64) -> Value {
        json!({
            "dt": dt,
            "main": { "temp": 291.3, "humidity": 72 },
            "wind": { "speed": 5.1 },
            "weather": [{ "description": "overcast clouds" }]
        })
    }

    #[tokio::test]
    async fn fetches_current_weather() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Sydney"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entry(1_700_000_000)))
            .mount(&mock_server)
            .await;

        let fetcher = OpenWeatherFetcher::new_with_base_url("KEY".into(), &mock_server.uri());
        let current = fetcher.current("Sydney").await.unwrap();

        assert_eq!(current["dt"], 1_700_000_000);
    }

    #[tokio::test]
    async fn fetches_forecast_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Perth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "city": { "name": "Perth", "country": "AU" },
                "list": [entry(1_700_000_000), entry(1_700_010_800)]
            })))
            .mount(&mock_server)
            .await;

        let fetcher = OpenWeatherFetcher::new_with_base_url("KEY".into(), &mock_server.uri());
        let list = fetcher.forecast("Perth").await.unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[1]["dt"], 1_700_010_800);
    }

    #[tokio::test]
    async fn forecast_without_list_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": "200" })))
            .mount(&mock_server)
            .await;

        let fetcher = OpenWeatherFetcher::new_with_base_url("KEY".into(), &mock_server.uri());
        let err = fetcher.forecast("Perth").await.unwrap_err();

        assert!(err.to_string().contains("no `list` array"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
            )
            .mount(&mock_server)
            .await;

        let fetcher = OpenWeatherFetcher::new_with_base_url("BAD".into(), &mock_server.uri());
        let err = fetcher.current("Sydney").await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
