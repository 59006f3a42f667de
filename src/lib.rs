//! IncidentLens - Incident digest pipeline
//!
//! This crate fetches an incident and its journal notes from a ServiceNow
//! instance, redacts personal data, and asks a language model for a short
//! summary or detailed resolution steps. The implementation prioritizes:
//!
//! 1. **Privacy** - Notes are redacted before they leave the process
//! 2. **Logging** - Every decision point logged with session context
//! 3. **Resilience** - Backend failures degrade to visible notices, never crashes
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `ticketing` - Table API client, records and query builders
//! - `security` - Redaction of emails, phone numbers and SSNs
//! - `aggregation` - Journal note merging and labeling
//! - `summarization` - Language-model gateway and OpenAI-compatible client
//! - `attachments` - Attachment filtering, summaries and download
//! - `session` - Session state, action dispatch and rendering
//! - `config` - TOML settings and API key lookup
//! - `logging` - Structured logging with session context

pub mod aggregation;
pub mod attachments;
pub mod config;
pub mod error;
pub mod logging;
pub mod security;
pub mod session;
pub mod summarization;
pub mod ticketing;

#[cfg(test)]
pub(crate) mod testing;

use config::LensConfig;
use error::LensResult;
use logging::structured::LogContext;
use session::dispatch::Orchestrator;
use summarization::gateway::SummarizationGateway;
use summarization::openai::OpenAiClient;
use ticketing::client::ServiceNowClient;

/// Orchestrator wired to the real backends.
pub type LiveOrchestrator = Orchestrator<ServiceNowClient, OpenAiClient>;

/// Initialize the process-wide logger.
///
/// `RUST_LOG` overrides the default level.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .format_timestamp_millis()
    .try_init();
}

/// Build the ticketing client, model client and gateway from configuration.
pub fn build_orchestrator(config: &LensConfig, ctx: &LogContext) -> LensResult<LiveOrchestrator> {
    let tickets = ServiceNowClient::new(&config.ticketing, ctx)?;
    let generator = OpenAiClient::new(&config.llm, &config.api_key)?;
    let gateway = SummarizationGateway::new(generator, &config.llm, ctx);

    log::info!(
        "{} ORCHESTRATOR_READY ticketing={} llm={}",
        ctx,
        tickets.base_url(),
        config.llm.base_url
    );

    Ok(Orchestrator::new(tickets, gateway, ctx))
}
