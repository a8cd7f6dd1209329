use serde::{Deserialize, Serialize};

/// Body of a `POST /v1/chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the model produced any text.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|content| !content.is_empty())
    }

    /// Convenience constructor for a single-choice assistant reply.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                index: 0,
                message: Some(ChatResponseMessage {
                    role: Some(ChatRole::Assistant),
                    content: Some(content.into()),
                }),
                finish_reason: Some("stop".to_string()),
            }],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub role: Option<ChatRole>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_openai_wire_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("usr")],
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.7,
                "max_tokens": 1000,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ]
            })
        );
    }

    #[test]
    fn first_content_treats_null_and_empty_as_missing() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id": "chatcmpl-1", "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]}"#,
        )
        .expect("deserialize");
        assert_eq!(response.first_content(), None);

        assert_eq!(ChatCompletionResponse::from_content("").first_content(), None);
        assert_eq!(ChatCompletionResponse::default().first_content(), None);
        assert_eq!(
            ChatCompletionResponse::from_content("{}").first_content(),
            Some("{}")
        );
    }
}
