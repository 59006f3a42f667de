//! Session state.
//!
//! Holds at most one incident's fetched data. Replaced wholesale on a new
//! fetch, reset by `clear`.

use crate::attachments::summarizer::AttachmentSummary;
use crate::ticketing::models::{AttachmentMeta, Incident, RawNote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    /// Summary and resolution steps may coexist for the same incident.
    IncidentLoaded {
        summary_ready: bool,
        resolution_ready: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub incident_number: Option<String>,
    pub incident: Option<Incident>,
    pub notes: Vec<RawNote>,
    pub summary: Option<String>,
    pub resolution_steps: Option<String>,
    pub attachments: Vec<AttachmentMeta>,
    pub attachment_summaries: Vec<AttachmentSummary>,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match &self.incident {
            None => SessionPhase::Empty,
            Some(_) => SessionPhase::IncidentLoaded {
                summary_ready: self.summary.is_some(),
                resolution_ready: self.resolution_steps.is_some(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phase() == SessionPhase::Empty
    }

    /// Summary text, if it was produced for the incident with `sys_id`.
    pub fn summary_for(&self, sys_id: &str) -> Option<String> {
        match &self.incident {
            Some(incident) if incident.sys_id == sys_id => self.summary.clone(),
            _ => None,
        }
    }
}
