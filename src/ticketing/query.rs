//! Table query builders.
//!
//! Generates the path and `sysparm_*` parameters for record-table queries.

pub const INCIDENT_TABLE: &str = "incident";
pub const JOURNAL_TABLE: &str = "sys_journal_field";
pub const ATTACHMENT_TABLE: &str = "sys_attachment";

/// A read-only query against one record table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: &'static str,
    pub filter: Option<(&'static str, String)>,
    pub fields: Vec<&'static str>,
    pub limit: Option<u32>,
}

impl TableQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            filter: None,
            fields: Vec::new(),
            limit: None,
        }
    }

    /// Equality filter, rendered as `field=value`.
    pub fn filter_eq(mut self, field: &'static str, value: &str) -> Self {
        self.filter = Some((field, value.to_string()));
        self
    }

    pub fn fields(mut self, fields: &[&'static str]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn path(&self) -> String {
        format!("/api/now/table/{}", self.table)
    }

    /// Query-string parameters in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some((field, value)) = &self.filter {
            params.push(("sysparm_query", format!("{}={}", field, value)));
        }
        if !self.fields.is_empty() {
            params.push(("sysparm_fields", self.fields.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("sysparm_limit", limit.to_string()));
        }
        params
    }
}

pub fn incident_by_number(number: &str) -> TableQuery {
    TableQuery::new(INCIDENT_TABLE)
        .filter_eq("number", number)
        .limit(1)
}

pub fn notes_for_incident(sys_id: &str, limit: u32) -> TableQuery {
    TableQuery::new(JOURNAL_TABLE)
        .filter_eq("element_id", sys_id)
        .fields(&["value", "sys_created_on", "element"])
        .limit(limit)
}

pub fn attachments_for_incident(sys_id: &str) -> TableQuery {
    TableQuery::new(ATTACHMENT_TABLE)
        .filter_eq("table_sys_id", sys_id)
        .fields(&["sys_id", "file_name"])
}

pub fn attachment_file_path(attachment_sys_id: &str) -> String {
    format!("/api/now/attachment/{}/file", attachment_sys_id)
}
