//! Value objects - immutable types that represent domain concepts

mod channel;
mod ids;

pub use channel::{Channel, ChannelParseError, RuleChannel};
pub use ids::{
    BroadcastId, CampaignId, ChannelAccountId, ContentId, CustomerId, DeliveryId, IdParseError,
    ImmediateId, InboundLogId, OutboxEntryId, RuleId, TagId, TenantId,
};
