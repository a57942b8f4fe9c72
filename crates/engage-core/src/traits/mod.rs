//! Ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    BroadcastRepository, ChannelAccountRepository, ContentStore, CustomerDirectory,
    CustomerTagRepository, HealthCheck, ImmediateRepository, InboundLogRepository,
    OutboxRepository, Page, RepoResult, RuleRepository,
};
