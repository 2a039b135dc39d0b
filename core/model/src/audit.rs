//! FILENAME: core/model/src/audit.rs
//! PURPOSE: Append-only audit trail entries for template mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a template version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditEvent {
    Save,
    Activate,
    Delete,
    Approve,
}

/// One audit record. Entries are only ever appended, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub event: AuditEvent,
    pub template_id: String,
    pub module: String,
    pub version: u32,
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(event: AuditEvent, template_id: &str, module: &str, version: u32) -> Self {
        AuditLogEntry {
            event,
            template_id: template_id.to_string(),
            module: module.to_string(),
            version,
            timestamp: Utc::now(),
        }
    }
}
