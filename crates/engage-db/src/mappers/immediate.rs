//! Immediate message entity <-> model mapper

use engage_core::audience::AudienceSpec;
use engage_core::entities::ImmediateMessage;
use engage_core::error::DomainError;
use engage_core::value_objects::{BroadcastId, ChannelAccountId, ContentId, ImmediateId, TenantId};

use super::enums::{parse_channel, parse_immediate_status, parse_template_kind};
use crate::models::ImmediateModel;

impl TryFrom<ImmediateModel> for ImmediateMessage {
    type Error = DomainError;

    fn try_from(model: ImmediateModel) -> Result<Self, Self::Error> {
        let audience: AudienceSpec = serde_json::from_value(model.audience)
            .map_err(|e| DomainError::DatabaseError(format!("invalid audience json: {e}")))?;

        Ok(ImmediateMessage {
            id: ImmediateId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            name: model.name,
            channel: parse_channel(&model.channel)?,
            channel_account_id: model.channel_account_id.map(ChannelAccountId::from_uuid),
            template_kind: parse_template_kind(&model.template_kind)?,
            template_id: model.template_id.map(ContentId::from_uuid),
            payload: model.payload,
            audience,
            status: parse_immediate_status(&model.status)?,
            last_broadcast_id: model.last_broadcast_id.map(BroadcastId::from_uuid),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Serialize an audience spec for the jsonb column
pub fn audience_to_value(audience: &AudienceSpec) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(audience).map_err(|e| DomainError::InternalError(e.to_string()))
}
