//! Session action dispatch.
//!
//! Each user action runs one fetch → process cycle to completion:
//! 1. Identifier check
//! 2. Incident lookup
//! 3. Resolution gating (resolution steps only)
//! 4. Note fetch and aggregation
//! 5. Redaction
//! 6. Summarization
//! 7. Attachment listing and summaries
//! 8. Return the new state and the notices to show

use crate::aggregation::notes::aggregate;
use crate::attachments::summarizer::{summarize_attachments, AttachmentSummary};
use crate::error::LensError;
use crate::logging::structured::LogContext;
use crate::security::redaction::redact_with_report;
use crate::summarization::gateway::SummarizationGateway;
use crate::summarization::generator::TextGenerator;
use crate::summarization::prompts::DEFAULT_TASK;
use crate::ticketing::client::TicketSource;
use crate::ticketing::models::{AttachmentMeta, Incident, RawNote};

use super::gate::{decide_resolution, ResolutionDecision, RESOLUTION_UNAVAILABLE_MESSAGE};
use super::state::SessionState;

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Summarize(String),
    ResolutionSteps(String),
    Clear,
}

/// Something the user should see after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(LensError),
    Error(LensError),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Result of dispatching one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub state: SessionState,
    pub notices: Vec<Notice>,
}

impl ActionOutcome {
    fn new(state: SessionState, notices: Vec<Notice>) -> Self {
        Self { state, notices }
    }
}

/// Redacted, aggregated note text for one incident.
struct PreparedNotes {
    notes: Vec<RawNote>,
    cleaned: String,
}

/// Owns the backends and turns actions into new session states.
pub struct Orchestrator<T: TicketSource, G: TextGenerator> {
    tickets: T,
    gateway: SummarizationGateway<G>,
    ctx: LogContext,
}

impl<T: TicketSource, G: TextGenerator> Orchestrator<T, G> {
    pub fn new(tickets: T, gateway: SummarizationGateway<G>, ctx: &LogContext) -> Self {
        Self {
            tickets,
            gateway,
            ctx: ctx.clone(),
        }
    }

    pub fn tickets(&self) -> &T {
        &self.tickets
    }

    pub fn gateway(&self) -> &SummarizationGateway<G> {
        &self.gateway
    }

    /// Apply `action` to `state`.
    pub fn dispatch(&self, state: SessionState, action: Action) -> ActionOutcome {
        log::debug!("{} ACTION_RECEIVED action={:?}", self.ctx, action);

        match action {
            Action::Summarize(number) => self.summarize(state, &number),
            Action::ResolutionSteps(number) => self.resolution_steps(state, &number),
            Action::Clear => {
                log::info!("{} SESSION_CLEARED", self.ctx);
                ActionOutcome::new(SessionState::default(), Vec::new())
            }
        }
    }

    fn summarize(&self, state: SessionState, number: &str) -> ActionOutcome {
        let (number, ctx, incident) = match self.lookup(number) {
            Ok(found) => found,
            Err(e) => return ActionOutcome::new(state, vec![Notice::Error(e)]),
        };

        let mut notices = Vec::new();
        let prepared = self.prepare_notes(&incident, &ctx, &mut notices);

        let summary = match self.gateway.summarize(&prepared.cleaned, DEFAULT_TASK) {
            Ok(summary) => Some(summary),
            Err(e) => {
                notices.push(Notice::Error(e));
                None
            }
        };

        let (attachments, attachment_summaries) = self.attachments(&incident, &ctx, &mut notices);

        log::info!(
            "{} SUMMARIZE_COMPLETE summary_ready={} attachments={}",
            ctx,
            summary.is_some(),
            attachment_summaries.len()
        );

        let new_state = SessionState {
            incident_number: Some(number),
            incident: Some(incident),
            notes: prepared.notes,
            summary,
            resolution_steps: None,
            attachments,
            attachment_summaries,
        };
        ActionOutcome::new(new_state, notices)
    }

    fn resolution_steps(&self, state: SessionState, number: &str) -> ActionOutcome {
        let (number, ctx, incident) = match self.lookup(number) {
            Ok(found) => found,
            Err(e) => return ActionOutcome::new(state, vec![Notice::Error(e)]),
        };

        if decide_resolution(&incident, &ctx) == ResolutionDecision::Blocked {
            return ActionOutcome::new(
                state,
                vec![Notice::Info(RESOLUTION_UNAVAILABLE_MESSAGE.to_string())],
            );
        }

        let mut notices = Vec::new();
        let prepared = self.prepare_notes(&incident, &ctx, &mut notices);

        let resolution_steps = match self
            .gateway
            .detailed_resolution_steps(&incident.number, &prepared.cleaned)
        {
            Ok(steps) => Some(steps),
            Err(e) => {
                notices.push(Notice::Error(e));
                None
            }
        };

        let (attachments, attachment_summaries) = self.attachments(&incident, &ctx, &mut notices);

        log::info!(
            "{} RESOLUTION_COMPLETE steps_ready={}",
            ctx,
            resolution_steps.is_some()
        );

        let new_state = SessionState {
            incident_number: Some(number),
            summary: state.summary_for(&incident.sys_id),
            incident: Some(incident),
            notes: prepared.notes,
            resolution_steps,
            attachments,
            attachment_summaries,
        };
        ActionOutcome::new(new_state, notices)
    }

    /// Identifier check and incident fetch shared by both loading actions.
    /// On error nothing past the incident lookup has been fetched.
    fn lookup(&self, number: &str) -> Result<(String, LogContext, Incident), LensError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(LensError::MissingIdentifier);
        }

        let ctx = self.ctx.with_incident(number);
        match self.tickets.fetch_incident(number) {
            Some(incident) => Ok((number.to_string(), ctx, incident)),
            None => {
                crate::log_warn!(ctx, "INCIDENT_NOT_FOUND", number = number);
                Err(LensError::NotFound(number.to_string()))
            }
        }
    }

    fn prepare_notes(
        &self,
        incident: &Incident,
        ctx: &LogContext,
        notices: &mut Vec<Notice>,
    ) -> PreparedNotes {
        let notes = self.tickets.fetch_notes(&incident.sys_id);
        let aggregated = aggregate(&notes, ctx);
        notices.extend(aggregated.skipped.into_iter().map(Notice::Warning));

        let (cleaned, _report) = redact_with_report(&aggregated.text, ctx);
        PreparedNotes { notes, cleaned }
    }

    fn attachments(
        &self,
        incident: &Incident,
        ctx: &LogContext,
        notices: &mut Vec<Notice>,
    ) -> (Vec<AttachmentMeta>, Vec<AttachmentSummary>) {
        let attachments = self.tickets.fetch_attachment_list(&incident.sys_id);
        if attachments.is_empty() {
            return (attachments, Vec::new());
        }

        let digest = summarize_attachments(&self.tickets, &self.gateway, &attachments, ctx);
        notices.extend(digest.errors.into_iter().map(Notice::Error));
        (attachments, digest.summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::SessionPhase;
    use crate::testing::{failing_gateway, fake_gateway, incident, FakeGenerator, FakeTickets};

    fn orchestrator(tickets: FakeTickets) -> Orchestrator<FakeTickets, FakeGenerator> {
        Orchestrator::new(tickets, fake_gateway(), &LogContext::new("test-session"))
    }

    fn open_incident_tickets() -> FakeTickets {
        FakeTickets::default()
            .with_incident(incident("INC0010001", "sys1", "2"))
            .with_notes(
                "sys1",
                vec![
                    RawNote::new("work_notes", "t1", "User jane@corp.com reports VPN drops"),
                    RawNote::new("comments", "t2", "Call me at 5551234567"),
                ],
            )
            .with_attachments(
                "sys1",
                vec![
                    AttachmentMeta::new("a1", "screen.png"),
                    AttachmentMeta::new("a2", "vpn.log"),
                ],
            )
            .with_file("a2", b"tunnel reset")
    }

    #[test]
    fn test_summarize_loads_incident() {
        let orch = orchestrator(open_incident_tickets());
        let outcome = orch.dispatch(
            SessionState::default(),
            Action::Summarize("INC0010001".to_string()),
        );

        assert!(outcome.notices.is_empty());
        let state = outcome.state;
        assert_eq!(
            state.phase(),
            SessionPhase::IncidentLoaded {
                summary_ready: true,
                resolution_ready: false,
            }
        );
        assert_eq!(state.incident_number.as_deref(), Some("INC0010001"));
        assert_eq!(state.summary.as_deref(), Some("generated summary"));
        assert_eq!(state.notes.len(), 2);
        assert_eq!(state.attachments.len(), 2);
        assert_eq!(state.attachment_summaries.len(), 1);
        assert_eq!(state.attachment_summaries[0].file_name, "vpn.log");
    }

    #[test]
    fn test_summarize_sends_redacted_labeled_notes() {
        let orch = orchestrator(open_incident_tickets());
        orch.dispatch(
            SessionState::default(),
            Action::Summarize("INC0010001".to_string()),
        );

        let prompts = orch.gateway().generator().completion_prompts();
        assert_eq!(
            prompts[0],
            "Summarize the following ticket notes:\n\n\
             Work Note (t1): User [REDACTED] reports VPN drops\n\
             Additional Comment (t2): Call me at [REDACTED]\n\
             \n\nResult:"
        );
    }

    #[test]
    fn test_summarize_clears_previous_resolution_steps() {
        let orch = orchestrator(open_incident_tickets());
        let prior = SessionState {
            incident: Some(incident("INC0010001", "sys1", "2")),
            resolution_steps: Some("old steps".to_string()),
            ..SessionState::default()
        };

        let outcome = orch.dispatch(prior, Action::Summarize("INC0010001".to_string()));
        assert_eq!(outcome.state.resolution_steps, None);
    }

    #[test]
    fn test_not_found_triggers_no_downstream_fetch() {
        let orch = orchestrator(open_incident_tickets());
        let prior = SessionState {
            incident_number: Some("INC0010001".to_string()),
            incident: Some(incident("INC0010001", "sys1", "2")),
            summary: Some("kept".to_string()),
            ..SessionState::default()
        };

        let outcome = orch.dispatch(prior.clone(), Action::Summarize("INC404".to_string()));

        assert_eq!(outcome.state, prior);
        assert_eq!(
            outcome.notices,
            vec![Notice::Error(LensError::NotFound("INC404".to_string()))]
        );
        assert_eq!(orch.tickets().incident_fetches(), vec!["INC404"]);
        assert!(orch.tickets().note_fetches().is_empty());
        assert!(orch.tickets().attachment_list_fetches().is_empty());
        assert_eq!(orch.gateway().generator().total_calls(), 0);
    }

    #[test]
    fn test_resolution_steps_not_found_keeps_loaded_state() {
        let orch = orchestrator(open_incident_tickets());
        let loaded = orch
            .dispatch(
                SessionState::default(),
                Action::Summarize("INC0010001".to_string()),
            )
            .state;
        let calls_before = orch.gateway().generator().total_calls();

        let outcome = orch.dispatch(loaded.clone(), Action::ResolutionSteps("INC404".to_string()));

        assert_eq!(outcome.state, loaded);
        assert_eq!(
            outcome.notices,
            vec![Notice::Error(LensError::NotFound("INC404".to_string()))]
        );
        assert_eq!(orch.tickets().incident_fetches(), vec!["INC0010001", "INC404"]);
        assert_eq!(orch.tickets().note_fetches(), vec!["sys1"]);
        assert_eq!(orch.tickets().attachment_list_fetches(), vec!["sys1"]);
        assert_eq!(orch.gateway().generator().total_calls(), calls_before);
        assert!(orch.gateway().generator().chat_prompts().is_empty());
    }

    #[test]
    fn test_empty_identifier_is_rejected_without_fetch() {
        let orch = orchestrator(open_incident_tickets());
        for action in [
            Action::Summarize("   ".to_string()),
            Action::ResolutionSteps(String::new()),
        ] {
            let outcome = orch.dispatch(SessionState::default(), action);
            assert!(outcome.state.is_empty());
            assert_eq!(
                outcome.notices,
                vec![Notice::Error(LensError::MissingIdentifier)]
            );
        }
        assert!(orch.tickets().incident_fetches().is_empty());
    }

    #[test]
    fn test_resolution_steps_blocked_for_terminal_states() {
        for code in ["5", "6", "7"] {
            let tickets = FakeTickets::default()
                .with_incident(incident("INC0020002", "sys2", code))
                .with_notes("sys2", vec![RawNote::new("work_notes", "t1", "done")]);
            let orch = orchestrator(tickets);

            let outcome = orch.dispatch(
                SessionState::default(),
                Action::ResolutionSteps("INC0020002".to_string()),
            );

            assert_eq!(
                outcome.notices,
                vec![Notice::Info(RESOLUTION_UNAVAILABLE_MESSAGE.to_string())]
            );
            assert!(outcome.state.is_empty());
            assert!(orch.tickets().note_fetches().is_empty());
            assert_eq!(orch.gateway().generator().total_calls(), 0);
        }
    }

    #[test]
    fn test_resolution_steps_keep_summary_of_same_incident() {
        let orch = orchestrator(open_incident_tickets());
        let loaded = orch
            .dispatch(
                SessionState::default(),
                Action::Summarize("INC0010001".to_string()),
            )
            .state;

        let outcome = orch.dispatch(loaded, Action::ResolutionSteps("INC0010001".to_string()));
        let state = outcome.state;

        assert_eq!(
            state.phase(),
            SessionPhase::IncidentLoaded {
                summary_ready: true,
                resolution_ready: true,
            }
        );
        assert_eq!(state.resolution_steps.as_deref(), Some("1. generated step"));

        let chats = orch.gateway().generator().chat_prompts();
        assert_eq!(chats.len(), 1);
        assert!(chats[0].starts_with("Provide detailed resolution steps for incident INC0010001:"));
        assert!(chats[0].contains("[REDACTED]"));
    }

    #[test]
    fn test_resolution_steps_drop_summary_of_other_incident() {
        let tickets = open_incident_tickets().with_incident(incident("INC0030003", "sys3", "1"));
        let orch = orchestrator(tickets);
        let loaded = orch
            .dispatch(
                SessionState::default(),
                Action::Summarize("INC0010001".to_string()),
            )
            .state;

        let state = orch
            .dispatch(loaded, Action::ResolutionSteps("INC0030003".to_string()))
            .state;
        assert_eq!(state.incident_number.as_deref(), Some("INC0030003"));
        assert_eq!(state.summary, None);
        assert!(state.resolution_steps.is_some());
    }

    #[test]
    fn test_malformed_note_surfaces_warning() {
        let mut broken = RawNote::new("work_notes", "t0", "");
        broken.sys_created_on = None;
        let tickets = FakeTickets::default()
            .with_incident(incident("INC1", "s1", "2"))
            .with_notes("s1", vec![broken, RawNote::new("comments", "t1", "ok")]);
        let orch = orchestrator(tickets);

        let outcome = orch.dispatch(SessionState::default(), Action::Summarize("INC1".to_string()));
        assert_eq!(
            outcome.notices,
            vec![Notice::Warning(LensError::MalformedNote {
                index: 0,
                missing: vec!["sys_created_on"],
            })]
        );
        assert!(outcome.state.summary.is_some());
    }

    #[test]
    fn test_summarization_failure_keeps_incident_loaded() {
        let tickets = FakeTickets::default().with_incident(incident("INC1", "s1", "2"));
        let orch = Orchestrator::new(tickets, failing_gateway(), &LogContext::new("test-session"));

        let outcome = orch.dispatch(SessionState::default(), Action::Summarize("INC1".to_string()));
        assert!(outcome.notices.iter().any(Notice::is_error));
        assert_eq!(
            outcome.state.phase(),
            SessionPhase::IncidentLoaded {
                summary_ready: false,
                resolution_ready: false,
            }
        );
    }

    #[test]
    fn test_clear_resets_everything() {
        let orch = orchestrator(open_incident_tickets());
        let loaded = orch
            .dispatch(
                SessionState::default(),
                Action::Summarize("INC0010001".to_string()),
            )
            .state;
        let loaded = orch
            .dispatch(loaded, Action::ResolutionSteps("INC0010001".to_string()))
            .state;
        assert!(!loaded.is_empty());

        let outcome = orch.dispatch(loaded, Action::Clear);
        assert_eq!(outcome.state, SessionState::default());
        assert_eq!(outcome.state.incident_number, None);
        assert!(outcome.state.notes.is_empty());
        assert!(outcome.notices.is_empty());
    }
}
