//! Note aggregation module.
//!
//! Turns an incident's journal entries into the text block that is
//! redacted and sent for summarization.

pub mod notes;

pub use notes::*;
