//! Immediate message database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for immediate_messages table
#[derive(Debug, Clone, FromRow)]
pub struct ImmediateModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub channel: String,
    pub channel_account_id: Option<Uuid>,
    pub template_kind: String,
    pub template_id: Option<Uuid>,
    pub payload: Option<Value>,
    pub audience: Value,
    pub status: String,
    pub last_broadcast_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
