//! Outbox entry entity <-> model mapper

use engage_core::entities::OutboxEntry;
use engage_core::error::DomainError;
use engage_core::value_objects::{ChannelAccountId, OutboxEntryId, RuleId, TenantId};

use super::enums::{parse_channel, parse_outbox_status};
use crate::models::OutboxEntryModel;

impl TryFrom<OutboxEntryModel> for OutboxEntry {
    type Error = DomainError;

    fn try_from(model: OutboxEntryModel) -> Result<Self, Self::Error> {
        Ok(OutboxEntry {
            id: OutboxEntryId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            channel: parse_channel(&model.channel)?,
            channel_account_id: model.channel_account_id.map(ChannelAccountId::from_uuid),
            destination: model.destination,
            payload: model.payload,
            status: parse_outbox_status(&model.status)?,
            rule_id: model.rule_id.map(RuleId::from_uuid),
            error_message: model.error_message,
            created_at: model.created_at,
        })
    }
}
