//! Summarization module.
//!
//! Sends redacted ticket text to a language-model backend for:
//! - Short summaries (completion endpoint)
//! - Detailed resolution steps (chat endpoint)

pub mod gateway;
pub mod generator;
pub mod openai;
pub mod prompts;

pub use gateway::*;
pub use generator::*;
pub use openai::*;
pub use prompts::*;
