//! Messaging channels
//!
//! `Channel` is a concrete transport. `RuleChannel` is the scope a rule is
//! saved under, which adds the channel-independent `ALL` scope.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error when parsing a channel name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {0}")]
pub struct ChannelParseError(pub String);

/// Concrete messaging transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Line,
    Messenger,
    Email,
    Sms,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Self::Line, Self::Messenger, Self::Email, Self::Sms];

    /// Storage / wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "LINE",
            Self::Messenger => "MESSENGER",
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
        }
    }

    /// Parse a channel name, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINE" => Some(Self::Line),
            "MESSENGER" => Some(Self::Messenger),
            "EMAIL" => Some(Self::Email),
            "SMS" => Some(Self::Sms),
            _ => None,
        }
    }

    /// Rule scope that auto-reply rules for this channel are saved under.
    ///
    /// Only chat channels carry auto-reply rules.
    pub fn rule_scope(self) -> Option<RuleChannel> {
        match self {
            Self::Line => Some(RuleChannel::Line),
            Self::Messenger => Some(RuleChannel::Messenger),
            Self::Email | Self::Sms => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = ChannelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ChannelParseError(s.to_string()))
    }
}

/// Scope a rule is saved under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleChannel {
    Line,
    Messenger,
    /// Channel-independent; used by label-keyword rules
    All,
}

impl RuleChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "LINE",
            Self::Messenger => "MESSENGER",
            Self::All => "ALL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINE" => Some(Self::Line),
            "MESSENGER" => Some(Self::Messenger),
            "ALL" => Some(Self::All),
            _ => None,
        }
    }

    #[inline]
    pub fn is_global(self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for RuleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleChannel {
    type Err = ChannelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ChannelParseError(s.to_string()))
    }
}
