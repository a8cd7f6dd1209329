use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::error::SdkError;
use crate::http::DynHttpTransport;

use super::{PairDataProvider, build_url, fetch_json};

const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com";
const PROVIDER: &str = "dexscreener";

/// DexScreener public API client. No authentication required.
pub struct DexScreenerProvider {
    transport: DynHttpTransport,
    base_url: String,
}

impl DexScreenerProvider {
    pub fn new(transport: DynHttpTransport) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PairDataProvider for DexScreenerProvider {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn token_pairs(&self, chain: &str, address: &str) -> Result<Value, SdkError> {
        let url = build_url(&self.base_url, &["token-pairs", "v1", chain, address], &[])?;
        fetch_json(self.transport.as_ref(), PROVIDER, url, Default::default()).await
    }
}
