use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::SdkError;
use crate::http::{DynHttpTransport, post_json_with_headers};
use crate::provider::{map_status_error, retry_after_from_headers};

use super::types::{ChatCompletionRequest, ChatCompletionResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const PROVIDER: &str = "openai_chat";

/// Anything that can answer a chat-completion request.
///
/// [`OpenAiChatClient`] is the network-backed implementation; tests provide stubs.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    async fn create(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, SdkError>;
}

pub type DynChatCompletionClient = Arc<dyn ChatCompletionClient>;

/// OpenAI Chat Completions client over the crate's [`crate::http::HttpTransport`].
pub struct OpenAiChatClient {
    transport: DynHttpTransport,
    base_url: String,
    api_key: String,
    organization: Option<String>,
    project: Option<String>,
}

impl OpenAiChatClient {
    /// Fails immediately when the API key is empty.
    pub fn new(transport: DynHttpTransport, api_key: impl Into<String>) -> Result<Self, SdkError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SdkError::invalid_config("api_key", "must not be empty"));
        }
        Ok(Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            organization: None,
            project: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/chat/completions")
        } else {
            format!("{base}/v1/chat/completions")
        }
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        );
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(org) = &self.organization {
            headers.insert("OpenAI-Organization".to_string(), org.clone());
        }
        if let Some(project) = &self.project {
            headers.insert("OpenAI-Project".to_string(), project.clone());
        }
        headers
    }
}

#[async_trait]
impl ChatCompletionClient for OpenAiChatClient {
    async fn create(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, SdkError> {
        debug!(model = %request.model, "sending chat completion");
        let response = post_json_with_headers(
            self.transport.as_ref(),
            self.endpoint(),
            self.build_headers(),
            &request,
        )
        .await?;

        let status = response.status;
        debug!(status, "chat completion responded");
        if !response.is_success() {
            let retry_after = retry_after_from_headers(&response.headers);
            let text = response.into_string()?;
            return Err(map_status_error(PROVIDER, status, &text, retry_after));
        }

        let text = response.into_string()?;
        serde_json::from_str(&text).map_err(|err| {
            SdkError::provider(PROVIDER, format!("failed to parse OpenAI response: {err}"))
        })
    }
}
