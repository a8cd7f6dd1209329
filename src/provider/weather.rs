use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::error::SdkError;
use crate::http::DynHttpTransport;

use super::{WeatherProvider, build_url, fetch_json};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const PROVIDER: &str = "openweather";

/// OpenWeatherMap current-weather client. The key travels in the `appid` query parameter.
pub struct OpenWeatherProvider {
    transport: DynHttpTransport,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherProvider {
    pub fn new(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            units: "metric".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `standard`, `metric` or `imperial`.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn weather(&self, city: &str) -> Result<Value, SdkError> {
        let url = build_url(
            &self.base_url,
            &["weather"],
            &[("q", city), ("appid", self.api_key.as_str()), ("units", self.units.as_str())],
        )?;
        fetch_json(self.transport.as_ref(), PROVIDER, url, Default::default()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::http::{HttpRequest, HttpResponse, HttpTransport};

    struct WeatherTransport {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpTransport for WeatherTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SdkError> {
            self.urls.lock().expect("lock").push(request.url);
            Ok(HttpResponse {
                status: 200,
                headers: Default::default(),
                body: br#"{"name": "London", "main": {"temp": 11.5}}"#.to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn weather_passes_city_and_key_as_query() {
        let transport = Arc::new(WeatherTransport {
            urls: Mutex::new(Vec::new()),
        });
        let provider = OpenWeatherProvider::new(transport.clone(), "owm-key").with_units("imperial");

        let report = provider.weather("London").await.expect("weather should load");

        assert_eq!(report, json!({"name": "London", "main": {"temp": 11.5}}));
        let urls = transport.urls.lock().expect("lock");
        assert_eq!(
            urls[0],
            "https://api.openweathermap.org/data/2.5/weather?q=London&appid=owm-key&units=imperial"
        );
    }
}
