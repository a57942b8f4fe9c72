//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod audience;
pub mod broadcast;
pub mod channel_account;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod immediate;
mod input;
pub mod rule;
pub mod template;

// Re-export all services for convenience
pub use audience::{AudienceResolver, ESTIMATE_SAMPLE_SIZE};
pub use broadcast::{BroadcastDraft, BroadcastService};
pub use channel_account::ChannelAccountService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dispatcher::{InboundDispatcher, InboundOutcome, TagWriteError};
pub use error::{ServiceError, ServiceResult};
pub use immediate::ImmediateService;
pub use rule::RuleService;
pub use template::TemplateResolver;
