//! Outbox entry database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for outbox_entries table
#[derive(Debug, Clone, FromRow)]
pub struct OutboxEntryModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub channel: String,
    pub channel_account_id: Option<Uuid>,
    pub destination: String,
    pub payload: Value,
    pub status: String,
    pub rule_id: Option<Uuid>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}
