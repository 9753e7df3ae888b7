use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    Config,
    error::GatewayError,
    model::{CurrentWeather, ForecastPayload, ForecastSample, Units},
};

use super::WeatherGateway;

#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    api_key: String,
    units: Units,
    base_url: String,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(api_key: String, units: Units) -> Self {
        Self {
            api_key,
            units,
            base_url: crate::config::DEFAULT_API_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            units: config.units,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Point the gateway at another server (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, city, units = %self.units, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                GatewayError::Transient(format!("Failed to send request to OpenWeather ({endpoint}): {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            GatewayError::Transient(format!("Failed to read OpenWeather {endpoint} response body: {e}"))
        })?;

        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(city.to_string()));
        }
        if !status.is_success() {
            return Err(GatewayError::Transient(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::Transient(format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn condition(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon) = condition(parsed.weather);
        CurrentWeather {
            city: parsed.name,
            temperature: parsed.main.temp,
            description,
            icon,
        }
    }
}

impl From<OwForecastEntry> for ForecastSample {
    fn from(entry: OwForecastEntry) -> Self {
        let (description, icon) = condition(entry.weather);
        ForecastSample {
            timestamp: entry.dt,
            dt_txt: entry.dt_txt,
            temperature: entry.main.temp,
            description,
            icon,
        }
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, GatewayError> {
        let parsed: OwCurrentResponse = self.get_json("weather", city).await?;
        Ok(parsed.into())
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload, GatewayError> {
        let parsed: OwForecastResponse = self.get_json("forecast", city).await?;
        Ok(ForecastPayload {
            samples: parsed.list.into_iter().map(ForecastSample::from).collect(),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> OpenWeatherGateway {
        OpenWeatherGateway::new("TEST_KEY".into(), Units::Metric).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn fetch_current_sends_query_and_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": { "temp": 18.6, "humidity": 40 },
                "weather": [{ "id": 800, "description": "clear sky", "icon": "01d" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let current = gateway(&server).fetch_current("Paris").await.expect("success");

        assert_eq!(current.city, "Paris");
        assert_eq!(current.temperature, 18.6);
        assert_eq!(current.description, "clear sky");
        assert_eq!(current.icon, "01d");
    }

    #[tokio::test]
    async fn fetch_current_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let err = gateway(&server).fetch_current("Atlantis").await.unwrap_err();
        assert_eq!(err, GatewayError::NotFound("Atlantis".into()));
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(500)))
            .mount(&server)
            .await;

        let err = gateway(&server).fetch_forecast("Paris").await.unwrap_err();
        match err {
            GatewayError::Transient(detail) => {
                assert!(detail.contains("500"));
                assert!(detail.ends_with("..."));
            }
            other => panic!("expected transient, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway(&server).fetch_current("Paris").await.unwrap_err();
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn fetch_forecast_keeps_samples_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "list": [
                    {
                        "dt": 1717405200,
                        "dt_txt": "2024-06-03 09:00:00",
                        "main": { "temp": 15.2 },
                        "weather": [{ "description": "few clouds", "icon": "02d" }]
                    },
                    {
                        "dt": 1717416000,
                        "dt_txt": "2024-06-03 12:00:00",
                        "main": { "temp": 20.0 },
                        "weather": []
                    }
                ]
            })))
            .mount(&server)
            .await;

        let payload = gateway(&server).fetch_forecast("Paris").await.expect("success");

        assert_eq!(payload.samples.len(), 2);
        assert_eq!(payload.samples[0].dt_txt, "2024-06-03 09:00:00");
        assert_eq!(payload.samples[1].temperature, 20.0);
        assert_eq!(payload.samples[1].description, "Unknown");
        assert_eq!(payload.samples[1].icon, "");
    }

    #[tokio::test]
    async fn unreachable_server_is_transient() {
        // Nothing listens on port 1.
        let gw = OpenWeatherGateway::new("KEY".into(), Units::Metric)
            .with_base_url("http://127.0.0.1:1");
        let err = gw.fetch_current("Paris").await.unwrap_err();
        assert!(matches!(err, GatewayError::Transient(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
