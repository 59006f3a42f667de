//! Security module.
//!
//! Provides redaction of personal data before ticket text leaves the
//! process for the language-model backend.

pub mod redaction;

pub use redaction::*;
