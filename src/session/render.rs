//! Plain-text rendering of session state and notices.

use std::fmt::Write as _;

use crate::ticketing::models::Incident;

use super::dispatch::Notice;
use super::state::SessionState;

const INCIDENT_COLUMNS: [&str; 6] = [
    "Incident Number",
    "Description",
    "Priority",
    "Resolved At",
    "Opened At",
    "State",
];

fn incident_row(incident: &Incident) -> [String; 6] {
    [
        incident.number.clone(),
        incident.description.clone(),
        incident.priority.clone(),
        incident.resolved_at.clone().unwrap_or_else(|| "-".to_string()),
        incident.opened_at.clone().unwrap_or_else(|| "-".to_string()),
        incident.state().label().to_string(),
    ]
}

/// Incident fields as an aligned two-column table.
pub fn render_incident_table(incident: &Incident) -> String {
    let width = INCIDENT_COLUMNS.iter().map(|c| c.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (column, value) in INCIDENT_COLUMNS.iter().zip(incident_row(incident)) {
        let _ = writeln!(out, "{:<width$} | {}", column, value, width = width);
    }
    out
}

fn render_block(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "\n{}\n{}\n{}", title, "-".repeat(title.len()), body);
}

/// Everything the session currently holds.
pub fn render_session(state: &SessionState) -> String {
    let incident = match &state.incident {
        Some(incident) => incident,
        None => return "No incident loaded.\n".to_string(),
    };

    let mut out = render_incident_table(incident);

    if let Some(summary) = &state.summary {
        render_block(&mut out, "Summarized Incident Notes", summary);
    }
    if let Some(steps) = &state.resolution_steps {
        render_block(&mut out, "Resolution Steps", steps);
    }

    out.push('\n');
    if state.attachments.is_empty() {
        out.push_str("No attachments found.\n");
    } else {
        out.push_str("Attachments:\n");
        for attachment in &state.attachment_summaries {
            let _ = writeln!(out, "Filename: {}", attachment.file_name);
            let _ = writeln!(
                out,
                "Summary: {}",
                attachment.summary.as_deref().unwrap_or("(unavailable)")
            );
            let _ = writeln!(out, "Download: download {}", attachment.sys_id);
        }
    }

    out
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Info(message) => format!("info: {}", message),
        Notice::Warning(err) => format!("warning: {}", err),
        Notice::Error(err) => format!("error: {}", err),
    }
}
