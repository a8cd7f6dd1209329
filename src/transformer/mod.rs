//! Sends arbitrary JSON through a chat model and parses the reply back into JSON.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::TransformerConfig;
use crate::error::{SdkError, TransformError};
use crate::http::reqwest::default_dyn_transport;

pub mod context;
pub mod openai_chat;
mod prompt;

pub use context::{FieldType, OutputField, OutputFormat, TransformationContext};
pub use openai_chat::{
    ChatCompletionClient, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    DynChatCompletionClient, OpenAiChatClient,
};

/// Model used when the context does not name one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Prompt-driven JSON transformer backed by a chat-completion model.
///
/// Each [`transform`](Self::transform) call issues exactly one request with a system
/// and a user message and parses the first choice's content as JSON. Nothing is
/// retried and nothing is kept between calls.
pub struct OpenAiTransformer {
    client: DynChatCompletionClient,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiTransformer {
    /// Builds a transformer over the default reqwest-backed OpenAI client.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidConfig`] when `config.api_key` is blank and
    /// [`SdkError::Transport`] when the HTTP client cannot be created.
    pub fn new(config: TransformerConfig) -> Result<Self, SdkError> {
        let transport = default_dyn_transport()?;
        let mut client = OpenAiChatClient::new(transport, config.api_key.clone())?;
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url.clone());
        }
        Ok(Self::with_client(&config, Arc::new(client)))
    }

    /// Uses a caller-provided chat client. The config's API key is not consulted; the
    /// client is expected to carry its own credentials.
    pub fn with_client(config: &TransformerConfig, client: DynChatCompletionClient) -> Self {
        Self {
            client,
            temperature: config.resolved_temperature(),
            max_tokens: config.resolved_max_tokens(),
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Transforms `input` into `T` by asking the model for a JSON reply.
    ///
    /// The output-format descriptor in `context` only shapes the prompt; the reply is
    /// not validated against it beyond deserializing into `T`.
    ///
    /// # Errors
    ///
    /// Every failure is a [`TransformError`] whose message reads
    /// `Transformation failed: <reason>`; see [`TransformError::kind`].
    #[instrument(skip_all, fields(model = tracing::field::Empty))]
    pub async fn transform<T, I>(
        &self,
        input: &I,
        context: Option<&TransformationContext>,
    ) -> Result<T, TransformError>
    where
        T: DeserializeOwned,
        I: Serialize + ?Sized,
    {
        let request = self.build_request(input, context)?;
        tracing::Span::current().record("model", request.model.as_str());

        let response = self
            .client
            .create(request)
            .await
            .map_err(TransformError::upstream)?;

        let content = response
            .first_content()
            .ok_or_else(TransformError::no_response)?;
        debug!(bytes = content.len(), "model replied");

        serde_json::from_str(content).map_err(TransformError::invalid_json)
    }

    fn build_request<I>(
        &self,
        input: &I,
        context: Option<&TransformationContext>,
    ) -> Result<ChatCompletionRequest, TransformError>
    where
        I: Serialize + ?Sized,
    {
        let system = prompt::system_prompt(context);
        let user = prompt::user_prompt(input, context).map_err(TransformError::invalid_input)?;
        let model = context
            .and_then(TransformationContext::model_override)
            .unwrap_or(DEFAULT_MODEL);

        Ok(ChatCompletionRequest {
            model: model.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        })
    }
}
