//! Journal note aggregation.
//!
//! Merges journal entries into one labeled text block in received order.
//! Entries missing a required field are skipped and reported, never fatal.

use crate::error::LensError;
use crate::logging::structured::LogContext;
use crate::ticketing::models::RawNote;

pub const WORK_NOTES_ELEMENT: &str = "work_notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    WorkNote,
    AdditionalComment,
}

impl NoteKind {
    pub fn from_element(element: &str) -> Self {
        if element == WORK_NOTES_ELEMENT {
            NoteKind::WorkNote
        } else {
            NoteKind::AdditionalComment
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NoteKind::WorkNote => "Work Note",
            NoteKind::AdditionalComment => "Additional Comment",
        }
    }
}

/// A note with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalNote<'a> {
    pub kind: NoteKind,
    pub created_on: &'a str,
    pub value: &'a str,
}

impl<'a> JournalNote<'a> {
    /// Validate a raw note, returning the names of missing fields on failure.
    pub fn from_raw(raw: &'a RawNote) -> Result<Self, Vec<&'static str>> {
        match (&raw.element, &raw.sys_created_on, &raw.value) {
            (Some(element), Some(created_on), Some(value)) => Ok(Self {
                kind: NoteKind::from_element(element),
                created_on,
                value,
            }),
            _ => {
                let mut missing = Vec::new();
                if raw.element.is_none() {
                    missing.push("element");
                }
                if raw.sys_created_on.is_none() {
                    missing.push("sys_created_on");
                }
                if raw.value.is_none() {
                    missing.push("value");
                }
                Err(missing)
            }
        }
    }

    pub fn render(&self) -> String {
        format!("{} ({}): {}\n", self.kind.label(), self.created_on, self.value)
    }
}

/// Aggregated text plus the notes that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedNotes {
    pub text: String,
    pub included: usize,
    /// One `LensError::MalformedNote` per skipped entry, in input order.
    pub skipped: Vec<LensError>,
}

impl AggregatedNotes {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Merge notes in received order into labeled lines.
pub fn aggregate(notes: &[RawNote], ctx: &LogContext) -> AggregatedNotes {
    let mut aggregated = AggregatedNotes::default();

    for (index, raw) in notes.iter().enumerate() {
        match JournalNote::from_raw(raw) {
            Ok(note) => {
                aggregated.text.push_str(&note.render());
                aggregated.included += 1;
            }
            Err(missing) => {
                crate::log_warn!(ctx, "NOTE_SKIPPED", index = index, missing = missing);
                aggregated
                    .skipped
                    .push(LensError::MalformedNote { index, missing });
            }
        }
    }

    log::debug!(
        "{} NOTES_AGGREGATED received={} included={} skipped={}",
        ctx,
        notes.len(),
        aggregated.included,
        aggregated.skipped.len()
    );

    aggregated
}
