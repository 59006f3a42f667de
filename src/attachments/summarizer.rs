//! Attachment summarization and download.
//!
//! Non-image attachments are fetched one at a time, decoded as UTF-8
//! (invalid sequences replaced) and summarized with the default task.

use std::path::{Path, PathBuf};

use crate::error::{LensError, LensResult};
use crate::logging::structured::LogContext;
use crate::summarization::gateway::SummarizationGateway;
use crate::summarization::generator::TextGenerator;
use crate::summarization::prompts::DEFAULT_TASK;
use crate::ticketing::client::TicketSource;
use crate::ticketing::models::AttachmentMeta;

use super::filter::is_image_attachment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSummary {
    pub sys_id: String,
    pub file_name: String,
    /// `None` when the summarization call failed.
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentDigest {
    pub summaries: Vec<AttachmentSummary>,
    pub errors: Vec<LensError>,
}

/// Summarize every non-image attachment, sequentially.
///
/// Attachments whose content cannot be fetched (or is empty) produce no
/// entry at all.
pub fn summarize_attachments<T, G>(
    source: &T,
    gateway: &SummarizationGateway<G>,
    attachments: &[AttachmentMeta],
    ctx: &LogContext,
) -> AttachmentDigest
where
    T: TicketSource,
    G: TextGenerator,
{
    let mut digest = AttachmentDigest::default();

    for attachment in attachments {
        if is_image_attachment(&attachment.file_name) {
            log::debug!("{} ATTACHMENT_IMAGE_SKIPPED file={}", ctx, attachment.file_name);
            continue;
        }

        let bytes = match source.fetch_attachment_bytes(&attachment.sys_id) {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                crate::log_warn!(ctx, "ATTACHMENT_UNAVAILABLE", file = attachment.file_name);
                continue;
            }
        };

        let content = String::from_utf8_lossy(&bytes);
        let summary = match gateway.summarize(&content, DEFAULT_TASK) {
            Ok(summary) => Some(summary),
            Err(e) => {
                digest.errors.push(e);
                None
            }
        };

        digest.summaries.push(AttachmentSummary {
            sys_id: attachment.sys_id.clone(),
            file_name: attachment.file_name.clone(),
            summary,
        });
    }

    log::info!(
        "{} ATTACHMENTS_SUMMARIZED listed={} summarized={} errors={}",
        ctx,
        attachments.len(),
        digest.summaries.len(),
        digest.errors.len()
    );

    digest
}

/// Fetch the content of a listed attachment.
///
/// `key` is matched against attachment ids first, then file names. File
/// names are not unique within an incident; a name resolves to the first
/// listed attachment carrying it, so duplicates are reached by id.
pub fn download_attachment<'a, T: TicketSource>(
    source: &T,
    attachments: &'a [AttachmentMeta],
    key: &str,
) -> LensResult<(&'a AttachmentMeta, Vec<u8>)> {
    let attachment = attachments
        .iter()
        .find(|a| a.sys_id == key)
        .or_else(|| attachments.iter().find(|a| a.file_name == key))
        .ok_or_else(|| LensError::AttachmentNotFound(key.to_string()))?;

    let bytes = source
        .fetch_attachment_bytes(&attachment.sys_id)
        .ok_or_else(|| {
            LensError::transport(
                &crate::ticketing::query::attachment_file_path(&attachment.sys_id),
                "download failed",
            )
        })?;
    Ok((attachment, bytes))
}

/// Write downloaded bytes into `dir`, keeping only the final path
/// component of `file_name`.
pub fn save_attachment(dir: &Path, file_name: &str, bytes: &[u8]) -> LensResult<PathBuf> {
    let name = Path::new(file_name)
        .file_name()
        .ok_or_else(|| LensError::Io(format!("invalid attachment file name: {}", file_name)))?;
    let target = dir.join(name);
    std::fs::write(&target, bytes)?;
    Ok(target)
}
