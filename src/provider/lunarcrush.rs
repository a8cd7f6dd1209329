use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::error::SdkError;
use crate::http::DynHttpTransport;

use super::{MarketDataProvider, bearer_headers, build_url, fetch_json};

const DEFAULT_BASE_URL: &str = "https://lunarcrush.com/api4";
const PROVIDER: &str = "lunarcrush";

/// LunarCrush v4 client for coin metrics and topic-level social data.
pub struct LunarCrushProvider {
    transport: DynHttpTransport,
    base_url: String,
    api_key: String,
}

impl LunarCrushProvider {
    /// An empty key is accepted here; LunarCrush rejects it on the first request.
    pub fn new(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get(&self, segments: &[&str]) -> Result<Value, SdkError> {
        let url = build_url(&self.base_url, segments, &[])?;
        fetch_json(
            self.transport.as_ref(),
            PROVIDER,
            url,
            bearer_headers(&self.api_key),
        )
        .await
    }
}

#[async_trait]
impl MarketDataProvider for LunarCrushProvider {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn coin(&self, symbol: &str) -> Result<Value, SdkError> {
        self.get(&["public", "coins", symbol, "v1"]).await
    }

    /// Topics are lowercase on LunarCrush, so `SOL` is looked up as `sol`.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn social_data(&self, symbol: &str) -> Result<Value, SdkError> {
        let topic = symbol.to_lowercase();
        self.get(&["public", "topic", topic.as_str(), "v1"]).await
    }
}
