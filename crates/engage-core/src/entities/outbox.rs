//! Outbox entry entity - a queued auto-reply waiting for the delivery worker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::value_objects::{Channel, ChannelAccountId, OutboxEntryId, RuleId, TenantId};

/// Outbox entry status; only the worker moves an entry past `Pending`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboxStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "SENT" => Some(Self::Sent),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One queued reply
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEntry {
    pub id: OutboxEntryId,
    pub tenant_id: TenantId,
    pub channel: Channel,
    pub channel_account_id: Option<ChannelAccountId>,
    pub destination: String,
    pub payload: Value,
    pub status: OutboxStatus,
    pub rule_id: Option<RuleId>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OutboxEntry {
    /// Create a pending entry
    pub fn pending(
        tenant_id: TenantId,
        channel: Channel,
        destination: String,
        payload: Value,
    ) -> Self {
        Self {
            id: OutboxEntryId::new(),
            tenant_id,
            channel,
            channel_account_id: None,
            destination,
            payload,
            status: OutboxStatus::Pending,
            rule_id: None,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_rule(mut self, rule_id: RuleId) -> Self {
        self.rule_id = Some(rule_id);
        self
    }

    pub fn with_account(mut self, account_id: Option<ChannelAccountId>) -> Self {
        self.channel_account_id = account_id;
        self
    }
}
