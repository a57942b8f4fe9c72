//! Parsing of string-typed request fields
//!
//! Requests carry enum values and ids as strings; a bad value becomes a
//! validation error naming the field.

use std::str::FromStr;

use engage_core::entities::{DeliveryStatus, MatchType, RuleStatus, TemplateKind};
use engage_core::value_objects::{Channel, RuleChannel, TagId};

use super::error::{ServiceError, ServiceResult};

pub(crate) fn channel(value: &str) -> ServiceResult<Channel> {
    Channel::parse(value).ok_or_else(|| ServiceError::validation(format!("Unknown channel: {value}")))
}

/// Channel that can receive inbound chat messages
pub(crate) fn chat_channel(value: &str) -> ServiceResult<Channel> {
    let channel = channel(value)?;
    if channel.rule_scope().is_none() {
        return Err(ServiceError::validation(format!(
            "Inbound messages are not supported on {channel}"
        )));
    }
    Ok(channel)
}

pub(crate) fn rule_channel(value: &str) -> ServiceResult<RuleChannel> {
    RuleChannel::parse(value)
        .ok_or_else(|| ServiceError::validation(format!("Unknown rule channel: {value}")))
}

pub(crate) fn rule_status(value: &str) -> ServiceResult<RuleStatus> {
    RuleStatus::parse(value)
        .ok_or_else(|| ServiceError::validation(format!("Unknown rule status: {value}")))
}

pub(crate) fn match_type(value: &str) -> ServiceResult<MatchType> {
    MatchType::parse(value)
        .ok_or_else(|| ServiceError::validation(format!("Unknown match type: {value}")))
}

pub(crate) fn template_kind(value: &str) -> ServiceResult<TemplateKind> {
    TemplateKind::parse(value)
        .ok_or_else(|| ServiceError::validation(format!("Unknown template kind: {value}")))
}

pub(crate) fn delivery_status(value: &str) -> ServiceResult<DeliveryStatus> {
    DeliveryStatus::parse(value)
        .ok_or_else(|| ServiceError::validation(format!("Unknown delivery status: {value}")))
}

pub(crate) fn id<T: FromStr>(field: &str, value: &str) -> ServiceResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ServiceError::validation(format!("Invalid {field} format")))
}

/// Absent and blank values both mean "no id"
pub(crate) fn optional_id<T: FromStr>(field: &str, value: Option<&str>) -> ServiceResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => id(field, v).map(Some),
        None => Ok(None),
    }
}

/// Trimmed, non-blank tag ids in caller order
pub(crate) fn tag_ids(values: &[String]) -> Vec<TagId> {
    values
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(TagId::from)
        .collect()
}

/// Trimmed, non-empty name
pub(crate) fn name(value: &str) -> ServiceResult<String> {
    let name = value.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("Name must not be empty"));
    }
    Ok(name.to_string())
}
