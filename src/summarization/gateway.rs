//! Summarization gateway.
//!
//! Builds prompts for the two summarization tasks and trims what the
//! backend returns. No retries: one failed call is one surfaced error.

use crate::config::LlmSettings;
use crate::error::LensResult;
use crate::logging::structured::LogContext;

use super::generator::{ChatMessage, ChatRequest, CompletionRequest, TextGenerator};
use super::prompts::{
    resolution_steps_prompt, summary_prompt, STEPS_MAX_TOKENS, STEPS_TEMPERATURE,
    SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE,
};

pub struct SummarizationGateway<G: TextGenerator> {
    generator: G,
    completion_model: String,
    chat_model: String,
    ctx: LogContext,
}

impl<G: TextGenerator> SummarizationGateway<G> {
    pub fn new(generator: G, settings: &LlmSettings, ctx: &LogContext) -> Self {
        Self {
            generator,
            completion_model: settings.completion_model.clone(),
            chat_model: settings.chat_model.clone(),
            ctx: ctx.clone(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Short summary of `text` for the given task verb.
    pub fn summarize(&self, text: &str, task: &str) -> LensResult<String> {
        let request = CompletionRequest {
            model: self.completion_model.clone(),
            prompt: summary_prompt(task, text),
            max_tokens: SUMMARY_MAX_TOKENS,
            n: 1,
            temperature: SUMMARY_TEMPERATURE,
        };

        log::debug!(
            "{} SUMMARIZE_START task={} model={} chars={}",
            self.ctx,
            task,
            request.model,
            text.len()
        );

        match self.generator.complete(&request) {
            Ok(raw) => {
                let summary = raw.trim().to_string();
                log::info!("{} SUMMARY_READY chars={}", self.ctx, summary.len());
                Ok(summary)
            }
            Err(e) => {
                crate::log_error!(self.ctx, "SUMMARIZE_FAILED", error = e.to_string());
                Err(e)
            }
        }
    }

    /// Step-by-step guidance for resolving `incident_number`.
    pub fn detailed_resolution_steps(&self, incident_number: &str, text: &str) -> LensResult<String> {
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![ChatMessage::user(&resolution_steps_prompt(
                incident_number,
                text,
            ))],
            max_tokens: STEPS_MAX_TOKENS,
            temperature: STEPS_TEMPERATURE,
        };

        log::debug!(
            "{} RESOLUTION_STEPS_START model={} chars={}",
            self.ctx,
            request.model,
            text.len()
        );

        match self.generator.chat(&request) {
            Ok(raw) => {
                let steps = raw.trim().to_string();
                log::info!("{} RESOLUTION_STEPS_READY chars={}", self.ctx, steps.len());
                Ok(steps)
            }
            Err(e) => {
                crate::log_error!(self.ctx, "RESOLUTION_STEPS_FAILED", error = e.to_string());
                Err(e)
            }
        }
    }
}
