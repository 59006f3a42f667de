//! Ticketing module.
//!
//! Read-only access to the ticketing backend's record tables:
//! - Incident lookup by number
//! - Journal notes for an incident
//! - Attachment metadata and file content

pub mod client;
pub mod models;
pub mod query;

pub use client::*;
pub use models::*;
pub use query::*;
