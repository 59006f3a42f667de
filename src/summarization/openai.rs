//! OpenAI-compatible completion and chat-completion client.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::LlmSettings;
use crate::error::{LensError, LensResult};

use super::generator::{ChatRequest, CompletionRequest, TextGenerator};

const COMPLETIONS_PATH: &str = "/v1/completions";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(settings: &LlmSettings, api_key: &str) -> LensResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("incidentlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LensError::Config(format!("cannot build model client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn post<T: serde::Serialize>(&self, path: &str, payload: &T) -> LensResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .map_err(|e| LensError::Summarization(format!("{} request failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<Value>()
                .ok()
                .and_then(|body| error_message(&body))
                .unwrap_or_default();
            return Err(LensError::Summarization(format!(
                "{} returned HTTP {} {}",
                path, status, detail
            )
            .trim_end()
            .to_string()));
        }

        response
            .json::<Value>()
            .map_err(|e| LensError::Summarization(format!("{} invalid response: {}", path, e)))
    }
}

impl TextGenerator for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> LensResult<String> {
        let body = self.post(COMPLETIONS_PATH, request)?;
        extract_completion_text(&body).ok_or_else(|| {
            LensError::Summarization("completion response missing choices[0].text".to_string())
        })
    }

    fn chat(&self, request: &ChatRequest) -> LensResult<String> {
        let body = self.post(CHAT_COMPLETIONS_PATH, request)?;
        extract_chat_content(&body).ok_or_else(|| {
            LensError::Summarization(
                "chat response missing choices[0].message.content".to_string(),
            )
        })
    }
}

pub fn extract_completion_text(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

pub fn extract_chat_content(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
