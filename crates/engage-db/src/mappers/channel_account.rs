//! Channel account entity <-> model mapper

use engage_core::entities::ChannelAccount;
use engage_core::error::DomainError;
use engage_core::value_objects::{ChannelAccountId, TenantId};

use super::enums::parse_channel;
use crate::models::ChannelAccountModel;

impl TryFrom<ChannelAccountModel> for ChannelAccount {
    type Error = DomainError;

    fn try_from(model: ChannelAccountModel) -> Result<Self, Self::Error> {
        Ok(ChannelAccount {
            id: ChannelAccountId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            channel: parse_channel(&model.channel)?,
            name: model.name,
            credentials: model.credentials,
            enabled: model.enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
