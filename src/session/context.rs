//! Session context management.
//!
//! Provides the session identity used to correlate log lines.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for one interactive session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new() -> Self {
        let session_id = format!("session-{}", &Uuid::new_v4().to_string()[..8]);

        Self {
            session_id,
            started_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.session_id)
    }

    /// Seconds since the session started.
    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
