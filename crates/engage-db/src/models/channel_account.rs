//! Channel account database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for channel_accounts table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelAccountModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub channel: String,
    pub name: String,
    pub credentials: Value,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
