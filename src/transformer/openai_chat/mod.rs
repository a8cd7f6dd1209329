//! Minimal OpenAI Chat Completions binding used by the transformer.

mod client;
mod types;

pub use client::{ChatCompletionClient, DynChatCompletionClient, OpenAiChatClient};
pub use types::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatResponseMessage,
    ChatRole, ChatUsage,
};
