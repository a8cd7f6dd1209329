//! The HTTP seam every outbound call goes through.
//!
//! Provider clients and the chat client only see [`HttpTransport`], so tests can
//! replace the network with an in-memory fake.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SdkError;

pub mod reqwest;

const JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outbound request as seen by a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// GET request with `Accept: application/json`.
    ///
    /// ```
    /// use waifu_sdk::http::{HttpMethod, HttpRequest};
    ///
    /// let request = HttpRequest::get("https://api.dexscreener.com/token-pairs/v1/solana/abc");
    /// assert_eq!(request.method, HttpMethod::Get);
    /// assert_eq!(request.headers.get("Accept").map(String::as_str), Some("application/json"));
    /// assert!(request.body.is_none());
    /// ```
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url, "Accept", None)
    }

    /// POST request carrying an already-encoded JSON body.
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self::new(HttpMethod::Post, url, "Content-Type", Some(body))
    }

    fn new(
        method: HttpMethod,
        url: impl Into<String>,
        json_header: &str,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::from([(json_header.to_string(), JSON.to_string())]),
            body,
        }
    }

    /// Adds `headers`, overwriting any header of the same name.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Fully buffered response. Header names are lowercase when produced by
/// [`reqwest::ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// ```
    /// use waifu_sdk::http::HttpResponse;
    ///
    /// let response = HttpResponse { status: 200, headers: Default::default(), body: b"{}".to_vec() };
    /// assert_eq!(response.into_string().unwrap(), "{}");
    /// ```
    ///
    /// # Errors
    ///
    /// [`SdkError::Transport`] when the body is not valid UTF-8.
    pub fn into_string(self) -> Result<String, SdkError> {
        String::from_utf8(self.body)
            .map_err(|err| SdkError::transport(format!("response body is not UTF-8: {err}")))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and buffers the whole response.
///
/// Only connection-level failures are errors; non-2xx statuses come back as ordinary
/// responses for the caller to interpret.
///
/// ```
/// # use async_trait::async_trait;
/// # use waifu_sdk::http::{HttpTransport, HttpRequest, HttpResponse};
/// # use waifu_sdk::error::SdkError;
/// struct AlwaysEmpty;
///
/// #[async_trait]
/// impl HttpTransport for AlwaysEmpty {
///     async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, SdkError> {
///         Ok(HttpResponse { status: 200, headers: Default::default(), body: b"[]".to_vec() })
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let response = AlwaysEmpty.send(HttpRequest::get("https://example.com")).await.unwrap();
/// assert!(response.is_success());
/// # });
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SdkError>;
}

pub type DynHttpTransport = Arc<dyn HttpTransport>;

/// Encodes `body` as JSON and POSTs it with the extra `headers`.
///
/// # Errors
///
/// [`SdkError::Validation`] when `body` cannot be encoded; otherwise whatever the
/// transport returns.
pub async fn post_json_with_headers<T: Serialize + ?Sized>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
) -> Result<HttpResponse, SdkError> {
    let payload = serde_json::to_vec(body).map_err(|err| SdkError::Validation {
        message: format!("failed to serialize request: {err}"),
    })?;
    transport
        .send(HttpRequest::post_json(url, payload).with_headers(headers))
        .await
}
