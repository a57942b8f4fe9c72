//! Content objects and template kinds
//!
//! Content objects live in per-channel content stores owned by the CRUD layer.
//! This domain only reads them, and always copies `content` into whatever
//! references it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::value_objects::{ContentId, TenantId};

/// Which content store a content object lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentKind {
    Line,
    Messenger,
    Email,
    Sms,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "LINE",
            Self::Messenger => "MESSENGER",
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a payload is bound: supplied inline, or taken from a content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateKind {
    Raw,
    LineContent,
    MessengerContent,
    EmailContent,
    SmsContent,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::LineContent => "LINE_CONTENT",
            Self::MessengerContent => "MESSENGER_CONTENT",
            Self::EmailContent => "EMAIL_CONTENT",
            Self::SmsContent => "SMS_CONTENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RAW" => Some(Self::Raw),
            "LINE_CONTENT" => Some(Self::LineContent),
            "MESSENGER_CONTENT" => Some(Self::MessengerContent),
            "EMAIL_CONTENT" => Some(Self::EmailContent),
            "SMS_CONTENT" => Some(Self::SmsContent),
            _ => None,
        }
    }

    /// Content store backing this kind; `None` for raw payloads
    pub fn content_kind(self) -> Option<ContentKind> {
        match self {
            Self::Raw => None,
            Self::LineContent => Some(ContentKind::Line),
            Self::MessengerContent => Some(ContentKind::Messenger),
            Self::EmailContent => Some(ContentKind::Email),
            Self::SmsContent => Some(ContentKind::Sms),
        }
    }

    /// Kinds an auto-reply rule may respond with
    pub fn is_rule_response(self) -> bool {
        matches!(self, Self::Raw | Self::LineContent | Self::MessengerContent)
    }
}

impl From<ContentKind> for TemplateKind {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Line => Self::LineContent,
            ContentKind::Messenger => Self::MessengerContent,
            ContentKind::Email => Self::EmailContent,
            ContentKind::Sms => Self::SmsContent,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named content object as read from a content store
#[derive(Debug, Clone, PartialEq)]
pub struct ContentObject {
    pub id: ContentId,
    pub tenant_id: TenantId,
    pub kind: ContentKind,
    pub name: String,
    pub content: Value,
    pub updated_at: DateTime<Utc>,
}

/// Payload snapshot produced by template resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTemplate {
    pub kind: TemplateKind,
    /// Always `None` for raw payloads
    pub template_id: Option<ContentId>,
    pub payload: Value,
}

/// A payload carries nothing to send when it is null or an empty string, array or object
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
