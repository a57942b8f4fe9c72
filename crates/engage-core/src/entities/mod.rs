//! Domain entities - core business objects

mod broadcast;
mod channel_account;
mod content;
mod customer;
mod immediate;
mod inbound_log;
mod outbox;
mod rule;

pub use broadcast::{Broadcast, BroadcastStats, Delivery, DeliveryOutcome, DeliveryStatus};
pub use channel_account::ChannelAccount;
pub use content::{is_empty_payload, ContentKind, ContentObject, ResolvedTemplate, TemplateKind};
pub use customer::{Customer, CustomerFilter, IdentifierKey, TagAssignment};
pub use immediate::{ImmediateMessage, ImmediateStatus};
pub use inbound_log::InboundLog;
pub use outbox::{OutboxEntry, OutboxStatus};
pub use rule::{
    by_precedence, normalize_keywords, MatchType, ResponseBinding, Rule, RuleKind, RuleMetadata,
    RuleStatus,
};
