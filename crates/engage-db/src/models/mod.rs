//! Database models - SQLx-compatible structs for PostgreSQL tables

mod broadcast;
mod channel_account;
mod customer;
mod immediate;
mod inbound_log;
mod outbox;
mod rule;

pub use broadcast::{BroadcastModel, DeliveryCountModel, DeliveryModel};
pub use channel_account::ChannelAccountModel;
pub use customer::{ContentModel, CustomerModel};
pub use immediate::ImmediateModel;
pub use inbound_log::InboundLogModel;
pub use outbox::OutboxEntryModel;
pub use rule::RuleModel;
