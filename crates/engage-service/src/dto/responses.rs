//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Identifiers are serialized as strings.

use chrono::{DateTime, Utc};
use engage_core::AudienceSpec;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Rule Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub id: String,
    pub channel: String,
    pub name: String,
    pub status: String,
    pub match_type: String,
    pub keywords: Vec<String>,
    pub tag_ids: Vec<String>,
    pub response_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Inline payload or the content snapshot taken when the rule was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a dry-run match
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMatchResponse {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    pub matched_keywords: Vec<String>,
    pub label_rule_ids: Vec<String>,
    /// Tags the message would apply
    pub tag_ids: Vec<String>,
}

// ============================================================================
// Inbound Responses
// ============================================================================

/// Summary of one inbound dispatch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundResultResponse {
    pub log_id: String,
    /// A response rule was selected
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule_id: Option<String>,
    pub matched_keywords: Vec<String>,
    pub label_matched_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox_entry_id: Option<String>,
    /// Tags confirmed on the customer, including ones already present
    pub assigned_tag_ids: Vec<String>,
    pub tag_failures: Vec<TagFailureResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagFailureResponse {
    pub tag_id: String,
    pub message: String,
}

// ============================================================================
// Channel Account Responses
// ============================================================================

/// Channel account; credentials are only present on single-account reads
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccountResponse {
    pub id: String,
    pub channel: String,
    pub name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Broadcast Responses
// ============================================================================

/// Returned once a broadcast and its deliveries are persisted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastQueuedResponse {
    pub broadcast_id: String,
    pub queued: i64,
    pub status: &'static str,
}

impl BroadcastQueuedResponse {
    pub fn new(broadcast_id: String, queued: i64) -> Self {
        Self {
            broadcast_id,
            queued,
            status: "QUEUED",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastStatsResponse {
    pub total: i64,
    pub queued: i64,
    pub sent: i64,
    pub failed: i64,
    /// No delivery is still queued
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    pub id: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_account_id: Option<String>,
    pub template_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub payload: Value,
    pub stats: BroadcastStatsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immediate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    pub id: String,
    pub broadcast_id: String,
    pub destination: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audience size and the first few destinations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceEstimateResponse {
    pub count: usize,
    pub sample: Vec<String>,
}

// ============================================================================
// Immediate Message Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmediateResponse {
    pub id: String,
    pub name: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_account_id: Option<String>,
    pub template_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub audience: AudienceSpec,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_broadcast_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmediateSendResponse {
    pub immediate: ImmediateResponse,
    pub broadcast: BroadcastQueuedResponse,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
