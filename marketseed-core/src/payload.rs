//! Typed notification payloads stored in the `payload` jsonb column.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// One variant per notification kind; serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    NewApplication { job_id: i64 },
    ApplicationStatus { job_id: i64, accepted: bool },
    MessageReceived { sender_id: i64, project_id: Option<i64> },
    MilestoneDue { project_id: i64, days_left: i32 },
    ReviewReceived { project_id: i64, rating: i32 },
    System { severity: Severity, link: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl NotificationPayload {
    /// Value of the `kind` column; matches the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::NewApplication { .. } => "new_application",
            NotificationPayload::ApplicationStatus { .. } => "application_status",
            NotificationPayload::MessageReceived { .. } => "message_received",
            NotificationPayload::MilestoneDue { .. } => "milestone_due",
            NotificationPayload::ReviewReceived { .. } => "review_received",
            NotificationPayload::System { .. } => "system",
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
