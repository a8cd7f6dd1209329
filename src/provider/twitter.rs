use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::error::SdkError;
use crate::http::DynHttpTransport;

use super::{SocialSearchProvider, bearer_headers, build_url, fetch_json};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2";
const PROVIDER: &str = "twitter";

/// Twitter/X v2 recent-search client.
pub struct TwitterProvider {
    transport: DynHttpTransport,
    base_url: String,
    bearer_token: String,
}

impl TwitterProvider {
    pub fn new(transport: DynHttpTransport, bearer_token: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: bearer_token.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SocialSearchProvider for TwitterProvider {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn search_tweets(&self, query: &str) -> Result<Value, SdkError> {
        let url = build_url(
            &self.base_url,
            &["tweets", "search", "recent"],
            &[("query", query)],
        )?;
        fetch_json(
            self.transport.as_ref(),
            PROVIDER,
            url,
            bearer_headers(&self.bearer_token),
        )
        .await
    }
}
