//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use engage_core::entities::{
    Broadcast, BroadcastStats, ChannelAccount, Delivery, ImmediateMessage, Rule,
};

use super::responses::{
    BroadcastResponse, BroadcastStatsResponse, ChannelAccountResponse, DeliveryResponse,
    ImmediateResponse, RuleResponse,
};

// ============================================================================
// Rule Mappers
// ============================================================================

impl From<&Rule> for RuleResponse {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id.to_string(),
            channel: rule.channel.as_str().to_string(),
            name: rule.name.clone(),
            status: rule.status.as_str().to_string(),
            match_type: rule.match_type.as_str().to_string(),
            keywords: rule.keywords.clone(),
            tag_ids: rule.tag_ids.iter().map(ToString::to_string).collect(),
            response_kind: rule.response.kind().as_str().to_string(),
            template_id: rule.response.template_id().map(|id| id.to_string()),
            payload: rule.response.payload().cloned(),
            metadata: rule.metadata.to_value(),
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

impl From<Rule> for RuleResponse {
    fn from(rule: Rule) -> Self {
        Self::from(&rule)
    }
}

// ============================================================================
// Channel Account Mappers
// ============================================================================

/// Summary view, credentials withheld
impl From<&ChannelAccount> for ChannelAccountResponse {
    fn from(account: &ChannelAccount) -> Self {
        Self {
            id: account.id.to_string(),
            channel: account.channel.as_str().to_string(),
            name: account.name.clone(),
            enabled: account.enabled,
            credentials: None,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl ChannelAccountResponse {
    /// Detailed view including the stored credentials
    pub fn with_credentials(account: &ChannelAccount) -> Self {
        Self {
            credentials: Some(account.credentials.clone()),
            ..Self::from(account)
        }
    }
}

// ============================================================================
// Broadcast Mappers
// ============================================================================

impl From<BroadcastStats> for BroadcastStatsResponse {
    fn from(stats: BroadcastStats) -> Self {
        Self {
            total: stats.total,
            queued: stats.queued,
            sent: stats.sent,
            failed: stats.failed,
            complete: stats.is_complete(),
        }
    }
}

impl From<&Broadcast> for BroadcastResponse {
    fn from(broadcast: &Broadcast) -> Self {
        Self {
            id: broadcast.id.to_string(),
            channel: broadcast.channel.as_str().to_string(),
            channel_account_id: broadcast.channel_account_id.map(|id| id.to_string()),
            template_kind: broadcast.template_kind.as_str().to_string(),
            template_id: broadcast.template_id.map(|id| id.to_string()),
            payload: broadcast.payload.clone(),
            stats: broadcast.stats.into(),
            immediate_id: broadcast.immediate_id.map(|id| id.to_string()),
            campaign_id: broadcast.campaign_id.map(|id| id.to_string()),
            metadata: broadcast.metadata.clone(),
            created_at: broadcast.created_at,
            updated_at: broadcast.updated_at,
        }
    }
}

impl From<&Delivery> for DeliveryResponse {
    fn from(delivery: &Delivery) -> Self {
        Self {
            id: delivery.id.to_string(),
            broadcast_id: delivery.broadcast_id.to_string(),
            destination: delivery.destination.clone(),
            status: delivery.status.as_str().to_string(),
            error_message: delivery.error_message.clone(),
            created_at: delivery.created_at,
            updated_at: delivery.updated_at,
        }
    }
}

// ============================================================================
// Immediate Mappers
// ============================================================================

impl From<&ImmediateMessage> for ImmediateResponse {
    fn from(immediate: &ImmediateMessage) -> Self {
        Self {
            id: immediate.id.to_string(),
            name: immediate.name.clone(),
            channel: immediate.channel.as_str().to_string(),
            channel_account_id: immediate.channel_account_id.map(|id| id.to_string()),
            template_kind: immediate.template_kind.as_str().to_string(),
            template_id: immediate.template_id.map(|id| id.to_string()),
            payload: immediate.payload.clone(),
            audience: immediate.audience.clone(),
            status: immediate.status.as_str().to_string(),
            last_broadcast_id: immediate.last_broadcast_id.map(|id| id.to_string()),
            created_at: immediate.created_at,
            updated_at: immediate.updated_at,
        }
    }
}
