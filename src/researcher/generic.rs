use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use crate::config::{ProviderKind, SdkConfig};
use crate::error::SdkError;
use crate::http::DynHttpTransport;
use crate::provider::{DynWeatherProvider, OpenWeatherProvider};

/// General-purpose lookups that are not tied to a token.
pub struct GenericResearcher {
    weather: DynWeatherProvider,
}

impl GenericResearcher {
    pub fn new(weather: DynWeatherProvider) -> Self {
        Self { weather }
    }

    pub fn from_config(config: &SdkConfig, transport: DynHttpTransport) -> Self {
        Self::new(Arc::new(OpenWeatherProvider::new(
            transport,
            config.api_key(ProviderKind::Weather),
        )))
    }

    /// Current weather for `city`, exactly as the weather provider returned it.
    #[instrument(skip(self))]
    pub async fn weather(&self, city: &str) -> Result<Value, SdkError> {
        self.weather.weather(city).await
    }
}
