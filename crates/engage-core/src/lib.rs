//! # engage-core
//!
//! Domain layer for inbound keyword matching and multi-channel broadcasts:
//! entities, value objects, pure matching logic, repository traits and events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod audience;
pub mod entities;
pub mod error;
pub mod events;
pub mod matching;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use audience::{AudienceMode, AudienceSpec, MAX_AUDIENCE_SIZE};
pub use entities::{
    Broadcast, BroadcastStats, ChannelAccount, ContentKind, ContentObject, Customer,
    CustomerFilter, Delivery, DeliveryOutcome, DeliveryStatus, IdentifierKey, ImmediateMessage,
    ImmediateStatus, InboundLog, MatchType, OutboxEntry, OutboxStatus, ResolvedTemplate,
    ResponseBinding, Rule, RuleKind, RuleMetadata, RuleStatus, TagAssignment, TemplateKind,
};
pub use error::DomainError;
pub use events::DeliveryStatusUpdated;
pub use traits::{
    BroadcastRepository, ChannelAccountRepository, ContentStore, CustomerDirectory,
    CustomerTagRepository, HealthCheck, ImmediateRepository, InboundLogRepository,
    OutboxRepository, Page, RepoResult, RuleRepository,
};
pub use value_objects::{
    BroadcastId, CampaignId, Channel, ChannelAccountId, ChannelParseError, ContentId, CustomerId,
    DeliveryId, IdParseError, ImmediateId, InboundLogId, OutboxEntryId, RuleChannel, RuleId,
    TagId, TenantId,
};
