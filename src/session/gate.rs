//! Resolution-steps gating.
//!
//! Decides whether an incident may get generated resolution steps.

use crate::logging::structured::LogContext;
use crate::ticketing::models::Incident;

pub const RESOLUTION_UNAVAILABLE_MESSAGE: &str =
    "Resolution steps are not available for Canceled or Closed or Resolved incidents.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionDecision {
    Allowed,
    Blocked,
}

/// # Decision Tree
/// 1. State code 5, 6 or 7 (Resolved, Closed, Canceled) -> Blocked
/// 2. Anything else, unknown codes included -> Allowed
pub fn decide_resolution(incident: &Incident, ctx: &LogContext) -> ResolutionDecision {
    let state = incident.state();

    if state.is_terminal() {
        log::info!(
            "{} RESOLUTION_DECISION allowed=false state={}",
            ctx,
            state.label()
        );
        return ResolutionDecision::Blocked;
    }

    log::debug!(
        "{} RESOLUTION_DECISION allowed=true state={}",
        ctx,
        state.label()
    );
    ResolutionDecision::Allowed
}
