//! Settings loading and validation.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LensError, LensResult};

pub const DEFAULT_CONFIG_FILE: &str = "incidentlens.toml";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_NOTES_LIMIT: u32 = 100;

const MASKED: &str = "***";

/// Ticketing instance and its fixed credential pair.
#[derive(Clone, Deserialize)]
pub struct TicketingSettings {
    pub instance: String,
    pub username: String,
    pub password: String,
    /// Overrides `https://<instance>`; used against local test servers.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_notes_limit")]
    pub notes_limit: u32,
}

impl TicketingSettings {
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.instance.trim_end_matches('/')),
        }
    }
}

impl fmt::Debug for TicketingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketingSettings")
            .field("instance", &self.instance)
            .field("username", &self.username)
            .field("password", &MASKED)
            .field("base_url", &self.base_url)
            .field("notes_limit", &self.notes_limit)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key_env: default_api_key_env(),
            completion_model: default_completion_model(),
            chat_model: default_chat_model(),
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileSettings {
    pub ticketing: TicketingSettings,
    #[serde(default)]
    pub llm: LlmSettings,
}

/// Fully resolved configuration, API key included.
#[derive(Clone)]
pub struct LensConfig {
    pub ticketing: TicketingSettings,
    pub llm: LlmSettings,
    pub api_key: String,
}

impl LensConfig {
    /// Load the file at `path` and the API key from the process environment.
    pub fn load(path: &Path) -> LensResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LensError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file = parse_settings(&raw)?;
        let api_key = std::env::var(&file.llm.api_key_env).ok();
        Self::resolve(file, api_key)
    }

    /// Combine file settings with an API key looked up elsewhere.
    pub fn resolve(file: FileSettings, api_key: Option<String>) -> LensResult<Self> {
        validate_ticketing(&file.ticketing)?;

        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => {
                return Err(LensError::Config(format!(
                    "API key not found. Please set the {} environment variable.",
                    file.llm.api_key_env
                )))
            }
        };

        Ok(Self {
            ticketing: file.ticketing,
            llm: file.llm,
            api_key,
        })
    }
}

impl fmt::Debug for LensConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LensConfig")
            .field("ticketing", &self.ticketing)
            .field("llm", &self.llm)
            .field("api_key", &MASKED)
            .finish()
    }
}

pub fn parse_settings(raw: &str) -> LensResult<FileSettings> {
    toml::from_str(raw).map_err(|e| LensError::Config(format!("invalid config: {}", e)))
}

fn validate_ticketing(settings: &TicketingSettings) -> LensResult<()> {
    let mut missing = Vec::new();
    if settings.instance.trim().is_empty() && settings.base_url.is_none() {
        missing.push("ticketing.instance");
    }
    if settings.username.trim().is_empty() {
        missing.push("ticketing.username");
    }
    if settings.password.is_empty() {
        missing.push("ticketing.password");
    }
    if !missing.is_empty() {
        return Err(LensError::Config(format!(
            "missing required settings: {}",
            missing.join(", ")
        )));
    }
    if settings.notes_limit == 0 {
        return Err(LensError::Config(
            "ticketing.notes_limit must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn default_notes_limit() -> u32 {
    DEFAULT_NOTES_LIMIT
}

fn default_llm_base_url() -> String {
    DEFAULT_LLM_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_completion_model() -> String {
    DEFAULT_COMPLETION_MODEL.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}
