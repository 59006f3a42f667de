//! In-memory fakes for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::LlmSettings;
use crate::error::{LensError, LensResult};
use crate::logging::structured::LogContext;
use crate::summarization::gateway::SummarizationGateway;
use crate::summarization::generator::{ChatRequest, CompletionRequest, TextGenerator};
use crate::ticketing::client::TicketSource;
use crate::ticketing::models::{AttachmentMeta, Incident, RawNote};

pub fn incident(number: &str, sys_id: &str, state: &str) -> Incident {
    Incident {
        number: number.to_string(),
        sys_id: sys_id.to_string(),
        description: format!("description of {}", number),
        priority: "3".to_string(),
        state: state.to_string(),
        opened_at: Some("2024-05-01 09:00:00".to_string()),
        resolved_at: None,
    }
}

/// Ticket source that records every call it receives.
#[derive(Default)]
pub struct FakeTickets {
    incidents: Vec<Incident>,
    notes: HashMap<String, Vec<RawNote>>,
    attachments: HashMap<String, Vec<AttachmentMeta>>,
    files: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<(&'static str, String)>>,
}

impl FakeTickets {
    pub fn with_incident(mut self, incident: Incident) -> Self {
        self.incidents.push(incident);
        self
    }

    pub fn with_notes(mut self, sys_id: &str, notes: Vec<RawNote>) -> Self {
        self.notes.insert(sys_id.to_string(), notes);
        self
    }

    pub fn with_attachments(mut self, sys_id: &str, attachments: Vec<AttachmentMeta>) -> Self {
        self.attachments.insert(sys_id.to_string(), attachments);
        self
    }

    pub fn with_file(mut self, attachment_sys_id: &str, bytes: &[u8]) -> Self {
        self.files.insert(attachment_sys_id.to_string(), bytes.to_vec());
        self
    }

    fn calls_of(&self, kind: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, arg)| arg.clone())
            .collect()
    }

    pub fn incident_fetches(&self) -> Vec<String> {
        self.calls_of("incident")
    }

    pub fn note_fetches(&self) -> Vec<String> {
        self.calls_of("notes")
    }

    pub fn attachment_list_fetches(&self) -> Vec<String> {
        self.calls_of("attachments")
    }

    pub fn byte_fetches(&self) -> Vec<String> {
        self.calls_of("file")
    }
}

impl TicketSource for FakeTickets {
    fn fetch_incident(&self, number: &str) -> Option<Incident> {
        self.calls.borrow_mut().push(("incident", number.to_string()));
        self.incidents.iter().find(|i| i.number == number).cloned()
    }

    fn fetch_notes(&self, sys_id: &str) -> Vec<RawNote> {
        self.calls.borrow_mut().push(("notes", sys_id.to_string()));
        self.notes.get(sys_id).cloned().unwrap_or_default()
    }

    fn fetch_attachment_list(&self, sys_id: &str) -> Vec<AttachmentMeta> {
        self.calls.borrow_mut().push(("attachments", sys_id.to_string()));
        self.attachments.get(sys_id).cloned().unwrap_or_default()
    }

    fn fetch_attachment_bytes(&self, attachment_sys_id: &str) -> Option<Vec<u8>> {
        self.calls
            .borrow_mut()
            .push(("file", attachment_sys_id.to_string()));
        self.files.get(attachment_sys_id).cloned()
    }
}

/// Generator returning canned text and recording prompts.
#[derive(Default)]
pub struct FakeGenerator {
    completions: RefCell<Vec<String>>,
    chats: RefCell<Vec<String>>,
    fail: bool,
}

impl FakeGenerator {
    pub fn completion_prompts(&self) -> Vec<String> {
        self.completions.borrow().clone()
    }

    pub fn chat_prompts(&self) -> Vec<String> {
        self.chats.borrow().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.completions.borrow().len() + self.chats.borrow().len()
    }
}

impl TextGenerator for FakeGenerator {
    fn complete(&self, request: &CompletionRequest) -> LensResult<String> {
        self.completions.borrow_mut().push(request.prompt.clone());
        if self.fail {
            return Err(LensError::Summarization("HTTP 503".to_string()));
        }
        Ok(" generated summary ".to_string())
    }

    fn chat(&self, request: &ChatRequest) -> LensResult<String> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.chats.borrow_mut().push(prompt);
        if self.fail {
            return Err(LensError::Summarization("HTTP 503".to_string()));
        }
        Ok("\n1. generated step\n".to_string())
    }
}

pub fn fake_gateway() -> SummarizationGateway<FakeGenerator> {
    SummarizationGateway::new(
        FakeGenerator::default(),
        &LlmSettings::default(),
        &LogContext::new("test-session"),
    )
}

pub fn failing_gateway() -> SummarizationGateway<FakeGenerator> {
    SummarizationGateway::new(
        FakeGenerator {
            fail: true,
            ..FakeGenerator::default()
        },
        &LlmSettings::default(),
        &LogContext::new("test-session"),
    )
}
