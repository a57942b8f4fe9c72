//! Broadcast and delivery database models

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for broadcasts table
#[derive(Debug, Clone, FromRow)]
pub struct BroadcastModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub channel: String,
    pub channel_account_id: Option<Uuid>,
    pub template_kind: String,
    pub template_id: Option<Uuid>,
    pub payload: Value,
    pub stats_total: i64,
    pub stats_queued: i64,
    pub stats_sent: i64,
    pub stats_failed: i64,
    pub immediate_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for deliveries table
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub broadcast_id: Uuid,
    pub destination: String,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the per-status delivery count
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryCountModel {
    pub status: String,
    pub count: i64,
}
