//! Broadcast / delivery entity <-> model mappers

use engage_core::entities::{Broadcast, BroadcastStats, Delivery, DeliveryStatus};
use engage_core::error::DomainError;
use engage_core::value_objects::{
    BroadcastId, CampaignId, ChannelAccountId, ContentId, DeliveryId, ImmediateId, TenantId,
};

use super::enums::{parse_channel, parse_delivery_status, parse_template_kind};
use crate::models::{BroadcastModel, DeliveryCountModel, DeliveryModel};

impl TryFrom<BroadcastModel> for Broadcast {
    type Error = DomainError;

    fn try_from(model: BroadcastModel) -> Result<Self, Self::Error> {
        Ok(Broadcast {
            id: BroadcastId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            channel: parse_channel(&model.channel)?,
            channel_account_id: model.channel_account_id.map(ChannelAccountId::from_uuid),
            template_kind: parse_template_kind(&model.template_kind)?,
            template_id: model.template_id.map(ContentId::from_uuid),
            payload: model.payload,
            stats: BroadcastStats {
                total: model.stats_total,
                queued: model.stats_queued,
                sent: model.stats_sent,
                failed: model.stats_failed,
            },
            immediate_id: model.immediate_id.map(ImmediateId::from_uuid),
            campaign_id: model.campaign_id.map(CampaignId::from_uuid),
            metadata: model.metadata,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<DeliveryModel> for Delivery {
    type Error = DomainError;

    fn try_from(model: DeliveryModel) -> Result<Self, Self::Error> {
        Ok(Delivery {
            id: DeliveryId::from_uuid(model.id),
            tenant_id: TenantId::from_uuid(model.tenant_id),
            broadcast_id: BroadcastId::from_uuid(model.broadcast_id),
            destination: model.destination,
            status: parse_delivery_status(&model.status)?,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Convert one group-by row into a `(status, count)` pair
pub fn delivery_count(model: DeliveryCountModel) -> Result<(DeliveryStatus, i64), DomainError> {
    Ok((parse_delivery_status(&model.status)?, model.count))
}
