//! Enum <-> column string conversions
//!
//! Stored values are the SCREAMING_SNAKE_CASE names. A value the domain does
//! not recognise is reported as a database error rather than guessed at.

use engage_core::entities::{
    ContentKind, DeliveryStatus, ImmediateStatus, MatchType, OutboxStatus, RuleStatus,
    TemplateKind,
};
use engage_core::error::DomainError;
use engage_core::value_objects::{Channel, RuleChannel};

fn invalid(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("invalid {column} value in database: {value}"))
}

pub fn parse_channel(value: &str) -> Result<Channel, DomainError> {
    Channel::parse(value).ok_or_else(|| invalid("channel", value))
}

pub fn parse_rule_channel(value: &str) -> Result<RuleChannel, DomainError> {
    RuleChannel::parse(value).ok_or_else(|| invalid("rule channel", value))
}

pub fn parse_match_type(value: &str) -> Result<MatchType, DomainError> {
    MatchType::parse(value).ok_or_else(|| invalid("match_type", value))
}

pub fn parse_template_kind(value: &str) -> Result<TemplateKind, DomainError> {
    TemplateKind::parse(value).ok_or_else(|| invalid("template kind", value))
}

pub fn parse_delivery_status(value: &str) -> Result<DeliveryStatus, DomainError> {
    DeliveryStatus::parse(value).ok_or_else(|| invalid("delivery status", value))
}

pub fn parse_outbox_status(value: &str) -> Result<OutboxStatus, DomainError> {
    OutboxStatus::parse(value).ok_or_else(|| invalid("outbox status", value))
}

pub fn parse_immediate_status(value: &str) -> Result<ImmediateStatus, DomainError> {
    ImmediateStatus::parse(value).ok_or_else(|| invalid("immediate status", value))
}

/// Unknown rule statuses are treated as inactive so they never fire
pub fn parse_rule_status(value: &str) -> RuleStatus {
    RuleStatus::from_str_lossy(value)
}

/// Content table backing a content kind
pub fn content_table(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Line => "line_contents",
        ContentKind::Messenger => "messenger_contents",
        ContentKind::Email => "email_contents",
        ContentKind::Sms => "sms_contents",
    }
}
