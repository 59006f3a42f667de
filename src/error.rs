//! Error taxonomy for the incident pipeline.
//!
//! Every external-call failure is converted to one of these values at its
//! boundary; nothing here is allowed to crash an interactive session.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LensError {
    #[error("incident {0} not found")]
    NotFound(String),

    #[error("please enter an incident number")]
    MissingIdentifier,

    #[error("transport failure calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("summarization failed: {0}")]
    Summarization(String),

    #[error("skipping note #{index} due to missing fields: {}", missing.join(", "))]
    MalformedNote {
        index: usize,
        missing: Vec<&'static str>,
    },

    #[error("attachment not found: {0}")]
    AttachmentNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

impl LensError {
    pub fn transport(endpoint: &str, err: impl std::fmt::Display) -> Self {
        LensError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    /// Fatal errors stop the process instead of being shown as a notice.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LensError::Config(_))
    }
}

impl From<std::io::Error> for LensError {
    fn from(err: std::io::Error) -> Self {
        LensError::Io(err.to_string())
    }
}

pub type LensResult<T> = Result<T, LensError>;
