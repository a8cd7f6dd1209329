use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;

use crate::error::SdkError;

use super::{DynHttpTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`HttpTransport`] over a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client with the crate's user agent and otherwise reqwest defaults (no timeout).
    pub fn default_client() -> Result<Self, SdkError> {
        Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map(Self::new)
            .map_err(|err| SdkError::transport(format!("failed to create reqwest client: {err}")))
    }

    fn build_request(&self, request: HttpRequest) -> Result<RequestBuilder, SdkError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| SdkError::transport(format!("invalid header name: {err}")))?;
            // Values may hold credentials, so only the header name is reported.
            let value = HeaderValue::from_str(&value)
                .map_err(|_| SdkError::transport(format!("invalid value for header {name}")))?;
            headers.insert(name, value);
        }

        let builder = self.client.request(method, &request.url).headers(headers);
        Ok(match request.body {
            Some(body) => builder.body(body),
            None => builder,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SdkError> {
        let method = request.method;
        // `without_url` keeps query-string API keys out of error messages.
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|err| SdkError::transport(err.without_url().to_string()))?;

        let status = response.status().as_u16();
        debug!(?method, status, "http response received");
        let headers = lowercase_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|err| SdkError::transport(err.without_url().to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// Copies headers into a map keyed by reqwest's lowercase names, skipping values
/// that are not visible ASCII.
fn lowercase_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

/// Shared handle to a [`ReqwestTransport::default_client`].
pub fn default_dyn_transport() -> Result<DynHttpTransport, SdkError> {
    Ok(Arc::new(ReqwestTransport::default_client()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_rejects_header_values_without_echoing_them() {
        let transport = ReqwestTransport::new(Client::new());
        let request = HttpRequest::get("https://example.com").with_headers(HashMap::from([(
            "Authorization".to_string(),
            "Bearer secret\nkey".to_string(),
        )]));

        let err = match transport.build_request(request) {
            Ok(_) => panic!("newline in header value should be rejected"),
            Err(err) => err,
        };
        let message = err.to_string();
        assert!(message.contains("authorization"), "{message}");
        assert!(!message.contains("secret"), "{message}");
    }

    #[test]
    fn lowercase_headers_skips_opaque_values() {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("30"));
        headers.insert(
            "x-binary",
            HeaderValue::from_bytes(&[0xfa, 0xfb]).expect("opaque value"),
        );

        let map = lowercase_headers(&headers);
        assert_eq!(map.get("retry-after").map(String::as_str), Some("30"));
        assert!(!map.contains_key("x-binary"));
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("waifu-sdk/"));
    }
}
