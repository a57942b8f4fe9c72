//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in engage-core.
//! Each repository handles database operations for a specific domain entity.

mod broadcast;
mod channel_account;
mod content;
mod customer;
mod error;
mod immediate;
mod inbound_log;
mod outbox;
mod rule;

pub use broadcast::PgBroadcastRepository;
pub use channel_account::PgChannelAccountRepository;
pub use content::{PgContentStore, PgHealthCheck};
pub use customer::{PgCustomerDirectory, PgCustomerTagRepository};
pub use immediate::PgImmediateRepository;
pub use inbound_log::PgInboundLogRepository;
pub use outbox::PgOutboxRepository;
pub use rule::PgRuleRepository;
