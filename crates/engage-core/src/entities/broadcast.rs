//! Broadcast and delivery entities
//!
//! A broadcast is one outbound send. It owns one delivery row per destination,
//! which the external worker moves from `QUEUED` to `SENT` or `FAILED`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::content::TemplateKind;
use crate::error::DomainError;
use crate::value_objects::{
    BroadcastId, CampaignId, Channel, ChannelAccountId, ContentId, DeliveryId, ImmediateId,
    TenantId,
};

/// Delivery status. `Sent` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    #[default]
    Queued,
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUEUED" => Some(Self::Queued),
            "SENT" => Some(Self::Sent),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status reported by the delivery worker for one delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryOutcome {
    Sent,
    Failed {
        #[serde(default, rename = "errorMessage")]
        error_message: Option<String>,
    },
}

impl DeliveryOutcome {
    pub fn status(&self) -> DeliveryStatus {
        match self {
            Self::Sent => DeliveryStatus::Sent,
            Self::Failed { .. } => DeliveryStatus::Failed,
        }
    }
}

/// Aggregated delivery counts for one broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BroadcastStats {
    pub total: i64,
    pub queued: i64,
    pub sent: i64,
    pub failed: i64,
}

impl BroadcastStats {
    /// Stats for a freshly created broadcast: everything queued
    pub fn queued(total: usize) -> Self {
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        Self {
            total,
            queued: total,
            sent: 0,
            failed: 0,
        }
    }

    /// Build from `(status, count)` pairs as returned by a group-by
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (DeliveryStatus, i64)>,
    {
        let mut stats = Self::default();
        for (status, count) in counts {
            match status {
                DeliveryStatus::Queued => stats.queued += count,
                DeliveryStatus::Sent => stats.sent += count,
                DeliveryStatus::Failed => stats.failed += count,
            }
            stats.total += count;
        }
        stats
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.queued == 0
    }
}

/// One outbound send
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcast {
    pub id: BroadcastId,
    pub tenant_id: TenantId,
    pub channel: Channel,
    pub channel_account_id: Option<ChannelAccountId>,
    pub template_kind: TemplateKind,
    pub template_id: Option<ContentId>,
    /// Resolved payload snapshot shared by every delivery
    pub payload: Value,
    pub stats: BroadcastStats,
    pub immediate_id: Option<ImmediateId>,
    pub campaign_id: Option<CampaignId>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Broadcast {
    /// Create a broadcast for `total` destinations, all queued
    pub fn new(
        tenant_id: TenantId,
        channel: Channel,
        template_kind: TemplateKind,
        template_id: Option<ContentId>,
        payload: Value,
        total: usize,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BroadcastId::new(),
            tenant_id,
            channel,
            channel_account_id: None,
            template_kind,
            template_id,
            payload,
            stats: BroadcastStats::queued(total),
            immediate_id: None,
            campaign_id: None,
            metadata: Value::Object(Default::default()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the delivery rows, one per destination, in destination order
    pub fn deliveries_for(&self, destinations: &[String]) -> Vec<Delivery> {
        destinations
            .iter()
            .map(|d| Delivery::queued(self.tenant_id, self.id, d.clone()))
            .collect()
    }
}

/// Per-destination delivery row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub id: DeliveryId,
    pub tenant_id: TenantId,
    pub broadcast_id: BroadcastId,
    pub destination: String,
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    pub fn queued(tenant_id: TenantId, broadcast_id: BroadcastId, destination: String) -> Self {
        let now = Utc::now();
        Self {
            id: DeliveryId::new(),
            tenant_id,
            broadcast_id,
            destination,
            status: DeliveryStatus::Queued,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a worker outcome; only a queued delivery may move
    pub fn transition(&mut self, outcome: DeliveryOutcome) -> Result<(), DomainError> {
        let to = outcome.status();
        if self.status.is_terminal() {
            return Err(DomainError::InvalidDeliveryTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;
        self.error_message = match outcome {
            DeliveryOutcome::Sent => None,
            DeliveryOutcome::Failed { error_message } => error_message,
        };
        self.updated_at = Utc::now();
        Ok(())
    }
}
