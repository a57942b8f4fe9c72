//! Inbound log database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for inbound_logs table
#[derive(Debug, Clone, FromRow)]
pub struct InboundLogModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub channel: String,
    pub text: String,
    pub metadata: Value,
    pub destination: Option<String>,
    pub matched_rule_id: Option<Uuid>,
    pub matched_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}
