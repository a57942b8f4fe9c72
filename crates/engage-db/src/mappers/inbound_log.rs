//! Inbound log entity <-> model mapper

use engage_core::entities::InboundLog;
use engage_core::error::DomainError;
use engage_core::value_objects::{InboundLogId, RuleId, TenantId};

use super::enums::parse_channel;
use crate::models::InboundLogModel;

impl TryFrom<InboundLogModel> for InboundLog {
    type Error = DomainError;

    fn try_from(model: InboundLogModel) -> Result<Self, Self::Error> {
        Ok(InboundLog {
            id: InboundLogId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            channel: parse_channel(&model.channel)?,
            text: model.text,
            metadata: model.metadata,
            destination: model.destination,
            matched_rule_id: model.matched_rule_id.map(RuleId::from_uuid),
            matched_keywords: model.matched_keywords,
            created_at: model.created_at,
        })
    }
}
