//! HTTP client for the ticketing table API.
//!
//! Every call is a single blocking request with basic auth. Failures are
//! logged here and degraded to "absent" (`None` / empty) for the caller.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::config::TicketingSettings;
use crate::error::{LensError, LensResult};
use crate::logging::structured::LogContext;

use super::models::{AttachmentMeta, Incident, RawNote, TableResponse};
use super::query::{
    attachment_file_path, attachments_for_incident, incident_by_number, notes_for_incident,
    TableQuery,
};

/// Read-only access to incidents, notes and attachments.
pub trait TicketSource {
    fn fetch_incident(&self, number: &str) -> Option<Incident>;
    fn fetch_notes(&self, sys_id: &str) -> Vec<RawNote>;
    fn fetch_attachment_list(&self, sys_id: &str) -> Vec<AttachmentMeta>;
    fn fetch_attachment_bytes(&self, attachment_sys_id: &str) -> Option<Vec<u8>>;
}

pub struct ServiceNowClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    notes_limit: u32,
    ctx: LogContext,
}

impl ServiceNowClient {
    pub fn new(settings: &TicketingSettings, ctx: &LogContext) -> LensResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("incidentlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LensError::Config(format!("cannot build ticketing client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            notes_limit: settings.notes_limit,
            ctx: ctx.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn query_rows(&self, query: &TableQuery) -> LensResult<Vec<Value>> {
        let path = query.path();
        log::debug!("{} TABLE_QUERY path={} params={:?}", self.ctx, path, query.params());

        let response = self
            .get(&path)
            .header(ACCEPT, "application/json")
            .query(&query.params())
            .send()
            .map_err(|e| LensError::transport(&path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LensError::transport(&path, format!("HTTP {}", status)));
        }

        let body: TableResponse = response
            .json()
            .map_err(|e| LensError::transport(&path, e))?;
        Ok(body.result)
    }

    fn rows_or_empty(&self, query: &TableQuery) -> Vec<Value> {
        match self.query_rows(query) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("{} TABLE_QUERY_FAILED table={} error={}", self.ctx, query.table, e);
                Vec::new()
            }
        }
    }
}

impl TicketSource for ServiceNowClient {
    fn fetch_incident(&self, number: &str) -> Option<Incident> {
        let rows = self.rows_or_empty(&incident_by_number(number));
        let row = rows.into_iter().next()?;

        match serde_json::from_value::<Incident>(row) {
            Ok(incident) => {
                log::info!(
                    "{} INCIDENT_FETCHED number={} sys_id={} state={}",
                    self.ctx,
                    incident.number,
                    incident.sys_id,
                    incident.state
                );
                Some(incident)
            }
            Err(e) => {
                log::warn!("{} INCIDENT_DECODE_FAILED number={} error={}", self.ctx, number, e);
                None
            }
        }
    }

    fn fetch_notes(&self, sys_id: &str) -> Vec<RawNote> {
        let rows = self.rows_or_empty(&notes_for_incident(sys_id, self.notes_limit));
        let notes: Vec<RawNote> = rows.iter().map(RawNote::from_row).collect();
        log::debug!("{} NOTES_FETCHED sys_id={} count={}", self.ctx, sys_id, notes.len());
        notes
    }

    fn fetch_attachment_list(&self, sys_id: &str) -> Vec<AttachmentMeta> {
        let rows = self.rows_or_empty(&attachments_for_incident(sys_id));
        let attachments: Vec<AttachmentMeta> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<AttachmentMeta>(row) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    log::warn!("{} ATTACHMENT_ROW_SKIPPED error={}", self.ctx, e);
                    None
                }
            })
            .collect();
        log::debug!(
            "{} ATTACHMENTS_LISTED sys_id={} count={}",
            self.ctx,
            sys_id,
            attachments.len()
        );
        attachments
    }

    fn fetch_attachment_bytes(&self, attachment_sys_id: &str) -> Option<Vec<u8>> {
        let path = attachment_file_path(attachment_sys_id);
        let result = self
            .get(&path)
            .send()
            .map_err(|e| LensError::transport(&path, e))
            .and_then(|response| {
                let status = response.status();
                if !status.is_success() {
                    return Err(LensError::transport(&path, format!("HTTP {}", status)));
                }
                response
                    .bytes()
                    .map(|b| b.to_vec())
                    .map_err(|e| LensError::transport(&path, e))
            });

        match result {
            Ok(bytes) => {
                log::debug!(
                    "{} ATTACHMENT_DOWNLOADED sys_id={} bytes={}",
                    self.ctx,
                    attachment_sys_id,
                    bytes.len()
                );
                Some(bytes)
            }
            Err(e) => {
                log::warn!("{} ATTACHMENT_DOWNLOAD_FAILED error={}", self.ctx, e);
                None
            }
        }
    }
}
