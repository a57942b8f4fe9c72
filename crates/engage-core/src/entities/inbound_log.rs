//! Inbound log entity - one evaluation of an inbound message

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::value_objects::{Channel, InboundLogId, RuleId, TenantId};

/// Immutable record of one inbound evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct InboundLog {
    pub id: InboundLogId,
    pub tenant_id: TenantId,
    pub channel: Channel,
    pub text: String,
    /// Raw webhook metadata, stored as received
    pub metadata: Value,
    pub destination: Option<String>,
    /// Response rule selected for this message, if any
    pub matched_rule_id: Option<RuleId>,
    pub matched_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl InboundLog {
    pub fn new(
        tenant_id: TenantId,
        channel: Channel,
        text: String,
        metadata: Value,
        destination: Option<String>,
    ) -> Self {
        Self {
            id: InboundLogId::new(),
            tenant_id,
            channel,
            text,
            metadata,
            destination,
            matched_rule_id: None,
            matched_keywords: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach the selected response rule and the keywords it matched
    pub fn with_match(mut self, rule_id: RuleId, keywords: Vec<String>) -> Self {
        self.matched_rule_id = Some(rule_id);
        self.matched_keywords = keywords;
        self
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.matched_rule_id.is_some()
    }
}
