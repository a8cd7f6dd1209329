//! Thin clients for the third-party data sources behind the researchers.
//!
//! Each capability is a small trait so facades can be handed any implementation. The
//! bundled clients return the upstream JSON untouched.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::SdkError;
use crate::http::{HttpRequest, HttpTransport};

pub mod dexscreener;
pub mod lunarcrush;
pub mod twitter;
pub mod weather;

mod retry;

pub(crate) use retry::retry_after_from_headers;

pub use dexscreener::DexScreenerProvider;
pub use lunarcrush::LunarCrushProvider;
pub use twitter::TwitterProvider;
pub use weather::OpenWeatherProvider;

/// Trading-pair data keyed by chain and token address.
#[async_trait]
pub trait PairDataProvider: Send + Sync {
    async fn token_pairs(&self, chain: &str, address: &str) -> Result<Value, SdkError>;
}

/// Market and social analytics keyed by token symbol.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn coin(&self, symbol: &str) -> Result<Value, SdkError>;

    async fn social_data(&self, symbol: &str) -> Result<Value, SdkError>;
}

/// Social-media search.
#[async_trait]
pub trait SocialSearchProvider: Send + Sync {
    async fn search_tweets(&self, query: &str) -> Result<Value, SdkError>;
}

/// Current weather keyed by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn weather(&self, city: &str) -> Result<Value, SdkError>;
}

pub type DynPairDataProvider = Arc<dyn PairDataProvider>;
pub type DynMarketDataProvider = Arc<dyn MarketDataProvider>;
pub type DynSocialSearchProvider = Arc<dyn SocialSearchProvider>;
pub type DynWeatherProvider = Arc<dyn WeatherProvider>;

/// Appends percent-encoded path segments and query pairs to `base`.
pub(crate) fn build_url(
    base: &str,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<String, SdkError> {
    let mut url =
        Url::parse(base).map_err(|err| SdkError::invalid_config("base_url", err.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SdkError::invalid_config("base_url", format!("{base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url.into())
}

pub(crate) fn bearer_headers(api_key: &str) -> HashMap<String, String> {
    HashMap::from([("Authorization".to_string(), format!("Bearer {api_key}"))])
}

/// Issues a GET request and decodes the body as JSON.
///
/// Non-2xx statuses are mapped through [`map_status_error`]. The URL is not logged
/// because some upstreams carry the API key in the query string.
pub(crate) async fn fetch_json(
    transport: &dyn HttpTransport,
    provider: &'static str,
    url: String,
    headers: HashMap<String, String>,
) -> Result<Value, SdkError> {
    let request = HttpRequest::get(url).with_headers(headers);
    let response = transport.send(request).await?;
    let status = response.status;
    debug!(provider, status, "provider responded");

    if !response.is_success() {
        let retry_after = retry_after_from_headers(&response.headers);
        let text = response.into_string()?;
        return Err(map_status_error(provider, status, &text, retry_after));
    }

    let text = response.into_string()?;
    serde_json::from_str(&text)
        .map_err(|err| SdkError::provider(provider, format!("failed to decode response: {err}")))
}

/// Turns an error status plus body into the matching [`SdkError`] variant.
///
/// Bodies shaped like `{"error": {"message": ..}}`, `{"error": ".."}` or
/// `{"message": ..}` are unpacked; anything else is reported verbatim.
pub(crate) fn map_status_error(
    provider: &'static str,
    status: u16,
    body: &str,
    retry_after: Option<std::time::Duration>,
) -> SdkError {
    let message = extract_error_message(body).unwrap_or_else(|| format!("status {status}: {body}"));
    match status {
        401 | 403 => SdkError::Auth { message },
        429 => SdkError::RateLimit {
            message,
            retry_after,
        },
        400 => SdkError::Validation { message },
        _ => SdkError::Provider { provider, message },
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<ErrorField>,
        message: Option<String>,
        detail: Option<String>,
    }
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorField {
        Text(String),
        Object {
            message: Option<String>,
            code: Option<Value>,
        },
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.error {
        Some(ErrorField::Text(text)) => Some(text),
        Some(ErrorField::Object { message, code }) => {
            let message = message.unwrap_or_else(|| "unknown error".to_string());
            Some(match code {
                Some(Value::Null) | None => message,
                Some(code) => format!("{message} ({code})"),
            })
        }
        None => parsed.message.or(parsed.detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn build_url_encodes_segments_and_query() {
        let url = build_url(
            "https://api.example.com/v1/",
            &["pairs", "sol ana"],
            &[("q", "New York"), ("units", "metric")],
        )
        .expect("valid url");

        assert_eq!(
            url,
            "https://api.example.com/v1/pairs/sol%20ana?q=New+York&units=metric"
        );
    }

    #[test]
    fn build_url_without_query_has_no_question_mark() {
        let url = build_url("https://api.example.com", &["a", "b"], &[]).expect("valid url");
        assert_eq!(url, "https://api.example.com/a/b");
    }

    #[test]
    fn build_url_rejects_invalid_base() {
        let err = build_url("not a url", &[], &[]).expect_err("invalid base");
        assert!(matches!(err, SdkError::InvalidConfig { ref field, .. } if field == "base_url"));
    }

    #[test]
    fn map_status_error_unpacks_openai_style_body() {
        let err = map_status_error(
            "openai_chat",
            401,
            r#"{"error": {"message": "Incorrect API key provided", "code": "invalid_api_key"}}"#,
            None,
        );
        match err {
            SdkError::Auth { message } => {
                assert_eq!(message, r#"Incorrect API key provided ("invalid_api_key")"#);
            }
            other => panic!("unexpected error type: {other:?}"),
        }
    }

    #[test]
    fn map_status_error_keeps_retry_after_for_rate_limits() {
        let err = map_status_error(
            "twitter",
            429,
            r#"{"detail": "Too Many Requests"}"#,
            Some(Duration::from_secs(15)),
        );
        match err {
            SdkError::RateLimit {
                message,
                retry_after,
            } => {
                assert_eq!(message, "Too Many Requests");
                assert_eq!(retry_after, Some(Duration::from_secs(15)));
            }
            other => panic!("unexpected error type: {other:?}"),
        }
    }

    #[test]
    fn map_status_error_falls_back_to_raw_body() {
        let err = map_status_error("dexscreener", 502, "Bad Gateway", None);
        match err {
            SdkError::Provider { provider, message } => {
                assert_eq!(provider, "dexscreener");
                assert_eq!(message, "status 502: Bad Gateway");
            }
            other => panic!("unexpected error type: {other:?}"),
        }
    }
}
