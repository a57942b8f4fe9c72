//! Customer and content database models (tables owned by the CRM layer)

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for customers table
#[derive(Debug, Clone, FromRow)]
pub struct CustomerModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_type: Option<String>,
    pub identifiers: Value,
}

/// Database model shared by the `*_contents` tables
#[derive(Debug, Clone, FromRow)]
pub struct ContentModel {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub content: Value,
    pub updated_at: DateTime<Utc>,
}
