//! Attachment module.
//!
//! Lists, summarizes and downloads incident attachments. Images are
//! filtered out by extension before any content is fetched.

pub mod filter;
pub mod summarizer;

pub use filter::*;
pub use summarizer::*;
