//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::{ContentKind, DeliveryStatus};
use crate::value_objects::{
    BroadcastId, ChannelAccountId, ContentId, DeliveryId, ImmediateId, RuleId,
};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("Broadcast not found: {0}")]
    BroadcastNotFound(BroadcastId),

    #[error("Delivery not found: {0}")]
    DeliveryNotFound(DeliveryId),

    #[error("Channel account not found: {0}")]
    ChannelAccountNotFound(ChannelAccountId),

    #[error("Immediate message not found: {0}")]
    ImmediateNotFound(ImmediateId),

    #[error("{kind} content not found: {id}")]
    ContentNotFound { kind: ContentKind, id: ContentId },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("At least one keyword is required")]
    EmptyKeywords,

    #[error("Rule name already exists for this channel")]
    RuleNameExists,

    #[error("Channel account name already exists for this channel")]
    ChannelAccountNameExists,

    #[error("Invalid audience mode: {0}")]
    InvalidAudienceMode(String),

    #[error("No destinations resolved")]
    NoDestinations,

    #[error("Too many destinations: {actual} exceeds limit of {max}")]
    TooManyDestinations { max: usize, actual: usize },

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Delivery cannot move from {from} to {to}")]
    InvalidDeliveryTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("Channel account is disabled")]
    ChannelAccountDisabled,

    #[error("Channel account belongs to a different channel")]
    ChannelAccountMismatch,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::RuleNotFound(_) => "UNKNOWN_RULE",
            Self::BroadcastNotFound(_) => "UNKNOWN_BROADCAST",
            Self::DeliveryNotFound(_) => "UNKNOWN_DELIVERY",
            Self::ChannelAccountNotFound(_) => "UNKNOWN_CHANNEL_ACCOUNT",
            Self::ImmediateNotFound(_) => "UNKNOWN_IMMEDIATE",
            Self::ContentNotFound { .. } => "UNKNOWN_CONTENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyKeywords => "EMPTY_KEYWORDS",
            Self::RuleNameExists => "RULE_NAME_EXISTS",
            Self::ChannelAccountNameExists => "CHANNEL_ACCOUNT_NAME_EXISTS",
            Self::InvalidAudienceMode(_) => "INVALID_AUDIENCE_MODE",
            Self::NoDestinations => "NO_DESTINATIONS",
            Self::TooManyDestinations { .. } => "TOO_MANY_DESTINATIONS",

            // Business Rules
            Self::InvalidDeliveryTransition { .. } => "INVALID_DELIVERY_TRANSITION",
            Self::ChannelAccountDisabled => "CHANNEL_ACCOUNT_DISABLED",
            Self::ChannelAccountMismatch => "CHANNEL_ACCOUNT_MISMATCH",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RuleNotFound(_)
                | Self::BroadcastNotFound(_)
                | Self::DeliveryNotFound(_)
                | Self::ChannelAccountNotFound(_)
                | Self::ImmediateNotFound(_)
                | Self::ContentNotFound { .. }
        )
    }

    /// Check if this is a validation error.
    ///
    /// Duplicate names are reported to callers as validation failures, and
    /// business-rule violations on a send request are too.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyKeywords
                | Self::RuleNameExists
                | Self::ChannelAccountNameExists
                | Self::InvalidAudienceMode(_)
                | Self::NoDestinations
                | Self::TooManyDestinations { .. }
                | Self::ChannelAccountDisabled
                | Self::ChannelAccountMismatch
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::InvalidDeliveryTransition { .. })
    }

    /// Check if this error comes from the storage layer rather than a business rule
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }
}
