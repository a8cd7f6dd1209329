use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

/// Aggregates every failure mode exposed by the provider clients and the chat client.
///
/// Facades never recover from these locally: whatever a provider returns is handed to
/// the caller unchanged, so the caller decides whether to retry or give up.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Represents transport-layer or networking failures.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// Reports invalid or missing credentials.
    #[error("auth failure: {message}")]
    Auth { message: String },
    /// Indicates that the upstream API throttled the request.
    #[error("rate limited: {message}")]
    RateLimit {
        /// Raw message returned by the upstream API.
        message: String,
        /// Optional wait duration suggested by the upstream before retrying.
        retry_after: Option<Duration>,
    },
    /// Signals validation failures in the request payload.
    #[error("invalid request: {message}")]
    Validation { message: String },
    /// Raised when building or validating configuration fails.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the configuration field that failed validation.
        field: String,
        /// Additional context explaining why the field is invalid.
        reason: String,
    },
    /// Wraps upstream errors that cannot be normalized.
    #[error("provider {provider} error: {message}")]
    Provider {
        /// Name of the upstream, such as `dexscreener`.
        provider: &'static str,
        /// Human-readable error message returned by the upstream.
        message: String,
    },
}

impl SdkError {
    /// Creates an [`SdkError::Transport`] from a textual description.
    ///
    /// # Examples
    ///
    /// ```
    /// use waifu_sdk::error::SdkError;
    ///
    /// let err = SdkError::transport("dns lookup failed");
    /// assert!(matches!(err, SdkError::Transport { .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an [`SdkError::Provider`] with the given provider name and message.
    ///
    /// # Examples
    ///
    /// ```
    /// use waifu_sdk::error::SdkError;
    ///
    /// let err = SdkError::provider("dexscreener", "bad JSON payload");
    /// assert!(matches!(err, SdkError::Provider { provider: "dexscreener", .. }));
    /// ```
    pub fn provider<T: Into<String>>(provider: &'static str, message: T) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    pub fn invalid_config<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

const NO_RESPONSE_MESSAGE: &str = "No response generated from OpenAI";
const INVALID_JSON_MESSAGE: &str = "Failed to parse OpenAI response as JSON";
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Distinguishes why a transformation failed without inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformErrorKind {
    /// The model returned no choices or empty content.
    NoResponse,
    /// The model replied with text that is not JSON of the expected shape.
    InvalidJson,
    /// The input could not be serialized into the user prompt.
    InvalidInput,
    /// The chat client itself failed (network, auth, status errors).
    Upstream,
}

/// The single error returned by [`crate::transformer::OpenAiTransformer::transform`].
///
/// The message always starts with `Transformation failed: ` followed by the reason of
/// the originating failure, so callers that only look at text still see the cause.
/// Code should branch on [`TransformError::kind`] instead.
#[derive(Debug, Error)]
#[error("Transformation failed: {reason}")]
pub struct TransformError {
    kind: TransformErrorKind,
    reason: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl TransformError {
    pub fn no_response() -> Self {
        Self {
            kind: TransformErrorKind::NoResponse,
            reason: NO_RESPONSE_MESSAGE.to_string(),
            source: None,
        }
    }

    pub fn invalid_json(source: serde_json::Error) -> Self {
        Self {
            kind: TransformErrorKind::InvalidJson,
            reason: INVALID_JSON_MESSAGE.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_input(source: serde_json::Error) -> Self {
        Self::wrap(TransformErrorKind::InvalidInput, source)
    }

    pub fn upstream(source: SdkError) -> Self {
        Self::wrap(TransformErrorKind::Upstream, source)
    }

    fn wrap<E>(kind: TransformErrorKind, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let message = source.to_string();
        let reason = if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            kind,
            reason,
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> TransformErrorKind {
        self.kind
    }

    /// Message of the originating failure, without the `Transformation failed: ` prefix.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
