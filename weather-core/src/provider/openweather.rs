use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    error::truncate_body,
    model::{WeatherQuery, WeatherReading},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Client for the OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// `base_url` is the provider host, e.g. [`DEFAULT_BASE_URL`] or a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CURRENT_WEATHER_PATH)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        debug!(%query, "requesting current weather");

        let mut params = query.params();
        params.push(("appid", self.api_key.clone()));

        let res = self
            .http
            .get(self.endpoint())
            .query(&params)
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::Network)?;

        if !status.is_success() {
            warn!(%status, %query, "weather provider rejected request");
            return Err(WeatherError::Http {
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(WeatherError::Decode)
    }
}
