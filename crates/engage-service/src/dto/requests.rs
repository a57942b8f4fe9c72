//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Enum-valued fields arrive as strings and are parsed by the services, so an
//! unknown value is reported as a validation error rather than a body rejection.

use engage_core::AudienceSpec;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

// ============================================================================
// Rule Requests
// ============================================================================

/// Create auto-reply rule request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
    #[validate(length(min = 1, max = 200, message = "Rule name must be 1-200 characters"))]
    pub name: String,

    /// LINE, MESSENGER or ALL
    pub channel: String,

    /// ACTIVE (default) or INACTIVE
    pub status: Option<String>,

    /// CONTAINS (default) or EQUALS
    pub match_type: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 keywords are required"))]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub tag_ids: Vec<String>,

    /// RAW (default), LINE_CONTENT or MESSENGER_CONTENT
    pub response_kind: Option<String>,

    pub template_id: Option<String>,

    /// Inline payload for RAW responses
    pub payload: Option<Value>,

    pub metadata: Option<Value>,
}

/// Partial rule update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRuleRequest {
    #[validate(length(min = 1, max = 200, message = "Rule name must be 1-200 characters"))]
    pub name: Option<String>,

    pub channel: Option<String>,

    pub status: Option<String>,

    pub match_type: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 keywords are required"))]
    pub keywords: Option<Vec<String>>,

    pub tag_ids: Option<Vec<String>>,

    pub response_kind: Option<String>,

    pub template_id: Option<String>,

    pub payload: Option<Value>,

    pub metadata: Option<Value>,
}

/// Dry-run a message against the active rule set
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMatchRequest {
    /// LINE or MESSENGER
    pub channel: String,

    #[validate(length(max = 5000, message = "Text must be at most 5000 characters"))]
    pub text: String,
}

// ============================================================================
// Inbound Requests
// ============================================================================

/// One parsed inbound chat message; the channel comes from the path
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessageRequest {
    #[validate(length(max = 5000, message = "Text must be at most 5000 characters"))]
    pub text: String,

    /// Channel-native user id (LINE userId, Messenger PSID)
    pub destination: Option<String>,

    /// Raw webhook metadata, stored verbatim on the log
    pub metadata: Option<Value>,
}

// ============================================================================
// Channel Account Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelAccountRequest {
    /// LINE, MESSENGER, EMAIL or SMS
    pub channel: String,

    #[validate(length(min = 1, max = 200, message = "Account name must be 1-200 characters"))]
    pub name: String,

    /// Opaque provider credentials
    pub credentials: Option<Value>,

    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChannelAccountRequest {
    #[validate(length(min = 1, max = 200, message = "Account name must be 1-200 characters"))]
    pub name: Option<String>,

    pub credentials: Option<Value>,

    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

// ============================================================================
// Broadcast Requests
// ============================================================================

/// Queue one broadcast
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendBroadcastRequest {
    /// LINE, MESSENGER, EMAIL or SMS
    pub channel: String,

    pub channel_account_id: Option<String>,

    /// RAW, LINE_CONTENT, MESSENGER_CONTENT, EMAIL_CONTENT or SMS_CONTENT
    pub template_kind: String,

    pub template_id: Option<String>,

    /// Inline payload for RAW sends
    pub payload: Option<Value>,

    /// Explicit destinations; take priority over `audience`
    pub destinations: Option<Vec<String>>,

    pub audience: Option<AudienceSpec>,

    pub metadata: Option<Value>,

    pub immediate_id: Option<String>,

    pub campaign_id: Option<String>,
}

/// Size an audience without sending
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EstimateAudienceRequest {
    pub channel: String,

    pub audience: AudienceSpec,
}

/// Outcome reported by the delivery worker; the delivery id comes from the path
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcomeRequest {
    /// SENT or FAILED
    pub status: String,

    #[validate(length(max = 2000, message = "Error message must be at most 2000 characters"))]
    pub error_message: Option<String>,
}

// ============================================================================
// Immediate Message Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateImmediateRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub channel: String,

    pub channel_account_id: Option<String>,

    pub template_kind: String,

    pub template_id: Option<String>,

    pub payload: Option<Value>,

    pub audience: AudienceSpec,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImmediateRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    pub channel: Option<String>,

    pub channel_account_id: Option<String>,

    pub template_kind: Option<String>,

    pub template_id: Option<String>,

    pub payload: Option<Value>,

    pub audience: Option<AudienceSpec>,
}
