//! Text-generation backend boundary.
//!
//! The gateway only needs text in, text out; `TextGenerator` hides which
//! service produces it.

use serde::Serialize;

use crate::error::LensResult;

/// Request to a plain text-completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub n: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Request to a conversational endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Single-shot, stateless text generation.
pub trait TextGenerator {
    /// Generated text of the first choice, untrimmed.
    fn complete(&self, request: &CompletionRequest) -> LensResult<String>;

    /// Content of the first returned message, untrimmed.
    fn chat(&self, request: &ChatRequest) -> LensResult<String>;
}
