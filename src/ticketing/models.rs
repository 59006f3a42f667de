//! Ticketing records as returned by the table API.
//!
//! The backend returns every field as a string and uses empty strings for
//! unset timestamps; those are normalized to `None` here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Incident snapshot. Never mutated by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub number: String,
    pub sys_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub priority: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub opened_at: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub resolved_at: Option<String>,
}

impl Incident {
    pub fn state(&self) -> IncidentState {
        IncidentState::from_code(&self.state)
    }
}

/// Incident lifecycle state, keyed by the backend's ordinal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncidentState {
    New,
    InProgress,
    OnHold,
    AwaitingInfo,
    Resolved,
    Closed,
    Canceled,
    Unknown(String),
}

impl IncidentState {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => IncidentState::New,
            "2" => IncidentState::InProgress,
            "3" => IncidentState::OnHold,
            "4" => IncidentState::AwaitingInfo,
            "5" => IncidentState::Resolved,
            "6" => IncidentState::Closed,
            "7" => IncidentState::Canceled,
            other => IncidentState::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            IncidentState::New => "New",
            IncidentState::InProgress => "In Progress",
            IncidentState::OnHold => "On Hold",
            IncidentState::AwaitingInfo => "Awaiting Info",
            IncidentState::Resolved => "Resolved",
            IncidentState::Closed => "Closed",
            IncidentState::Canceled => "Canceled",
            IncidentState::Unknown(_) => "Unknown State",
        }
    }

    /// Resolved, Closed and Canceled incidents get no resolution steps.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IncidentState::Resolved | IncidentState::Closed | IncidentState::Canceled
        )
    }
}

/// Journal entry exactly as received. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub sys_created_on: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl RawNote {
    pub fn new(element: &str, sys_created_on: &str, value: &str) -> Self {
        Self {
            element: Some(element.to_string()),
            sys_created_on: Some(sys_created_on.to_string()),
            value: Some(value.to_string()),
        }
    }

    /// Lenient conversion from one result row. Non-string fields count as
    /// missing.
    pub fn from_row(row: &Value) -> Self {
        let field = |name: &str| row.get(name).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            element: field("element"),
            sys_created_on: field("sys_created_on"),
            value: field("value"),
        }
    }
}

/// Attachment metadata row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    pub sys_id: String,
    pub file_name: String,
}

impl AttachmentMeta {
    pub fn new(sys_id: &str, file_name: &str) -> Self {
        Self {
            sys_id: sys_id.to_string(),
            file_name: file_name.to_string(),
        }
    }
}

/// Envelope of every table query response.
#[derive(Debug, Default, Deserialize)]
pub struct TableResponse {
    #[serde(default)]
    pub result: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
