//! Auto-reply rule database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for auto_reply_rules table
#[derive(Debug, Clone, FromRow)]
pub struct RuleModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub channel: String,
    pub name: String,
    pub status: String,
    pub match_type: String,
    pub keywords: Vec<String>,
    pub tag_ids: Vec<String>,
    pub response_kind: String,
    pub line_content_id: Option<Uuid>,
    pub messenger_content_id: Option<Uuid>,
    pub response_payload: Option<Value>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
