//! Immediate message entity - a saved, reusable send definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::TemplateKind;
use crate::audience::AudienceSpec;
use crate::value_objects::{BroadcastId, Channel, ChannelAccountId, ContentId, ImmediateId, TenantId};

/// Immediate message status; never goes back to `Draft`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImmediateStatus {
    #[default]
    Draft,
    Sent,
}

impl ImmediateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "SENT" => Some(Self::Sent),
            _ => None,
        }
    }
}

/// Saved send definition
#[derive(Debug, Clone, PartialEq)]
pub struct ImmediateMessage {
    pub id: ImmediateId,
    pub tenant_id: TenantId,
    pub name: String,
    pub channel: Channel,
    pub channel_account_id: Option<ChannelAccountId>,
    pub template_kind: TemplateKind,
    pub template_id: Option<ContentId>,
    /// Inline payload, used when `template_kind` is RAW
    pub payload: Option<Value>,
    pub audience: AudienceSpec,
    pub status: ImmediateStatus,
    pub last_broadcast_id: Option<BroadcastId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImmediateMessage {
    pub fn new(
        tenant_id: TenantId,
        name: String,
        channel: Channel,
        template_kind: TemplateKind,
        audience: AudienceSpec,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ImmediateId::new(),
            tenant_id,
            name,
            channel,
            channel_account_id: None,
            template_kind,
            template_id: None,
            payload: None,
            audience,
            status: ImmediateStatus::Draft,
            last_broadcast_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_sent(&self) -> bool {
        self.status == ImmediateStatus::Sent
    }

    /// Record a successful send
    pub fn mark_sent(&mut self, broadcast_id: BroadcastId) {
        self.status = ImmediateStatus::Sent;
        self.last_broadcast_id = Some(broadcast_id);
        self.updated_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
