//! Redaction of sensitive personal data in ticket text.
//!
//! Detects and replaces, in this order:
//! - Email addresses
//! - Phone numbers (exactly 10 digits)
//! - SSNs (`DDD-DD-DDDD`)
//!
//! Every match becomes the literal [`REDACTION_TOKEN`]. Patterns run
//! independently; a later pattern sees the output of the earlier ones and
//! overlapping matches are not reconciled.

use lazy_static::lazy_static;
use regex::Regex;

use crate::logging::structured::LogContext;

pub const REDACTION_TOKEN: &str = "[REDACTED]";

/// A named, compiled redaction pattern.
#[derive(Debug)]
pub struct RedactionPattern {
    pub name: &'static str,
    pub regex: Regex,
}

lazy_static! {
    /// Process-wide pattern set, applied in declaration order.
    pub static ref REDACTION_PATTERNS: Vec<RedactionPattern> = vec![
        RedactionPattern {
            name: "email",
            regex: Regex::new(
                r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?-u:\b)"
            ).unwrap(),
        },
        RedactionPattern {
            name: "phone",
            regex: Regex::new(r"(?-u:\b)[0-9]{10}(?-u:\b)").unwrap(),
        },
        RedactionPattern {
            name: "ssn",
            regex: Regex::new(r"(?-u:\b)[0-9]{3}-[0-9]{2}-[0-9]{4}(?-u:\b)").unwrap(),
        },
    ];
}

/// Redaction counts per pattern.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedactionReport {
    pub emails_found: usize,
    pub phones_found: usize,
    pub ssns_found: usize,
}

impl RedactionReport {
    pub fn total_entities(&self) -> usize {
        self.emails_found + self.phones_found + self.ssns_found
    }

    fn record(&mut self, pattern: &str, count: usize) {
        match pattern {
            "email" => self.emails_found += count,
            "phone" => self.phones_found += count,
            "ssn" => self.ssns_found += count,
            _ => {}
        }
    }
}

/// Replace every sensitive match in `text` with [`REDACTION_TOKEN`].
pub fn redact(text: &str) -> String {
    let mut report = RedactionReport::default();
    redact_string(text, &mut report)
}

/// Redact and log what was found.
pub fn redact_with_report(text: &str, ctx: &LogContext) -> (String, RedactionReport) {
    log::debug!("{} REDACT_START chars={}", ctx, text.len());

    let mut report = RedactionReport::default();
    let redacted = redact_string(text, &mut report);

    if report.total_entities() > 0 {
        log::info!(
            "{} PII_REDACTED emails={} phones={} ssns={}",
            ctx,
            report.emails_found,
            report.phones_found,
            report.ssns_found
        );
    } else {
        log::debug!("{} REDACT_COMPLETE entities_found=0", ctx);
    }

    (redacted, report)
}

fn redact_string(text: &str, report: &mut RedactionReport) -> String {
    let mut redacted = text.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        let count = pattern.regex.find_iter(&redacted).count();
        if count > 0 {
            report.record(pattern.name, count);
            redacted = pattern
                .regex
                .replace_all(&redacted, REDACTION_TOKEN)
                .into_owned();
        }
    }

    redacted
}
