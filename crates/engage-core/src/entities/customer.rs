//! Customer view used for tag side effects and audience filters
//!
//! Customers are owned by the CRM layer. This domain only looks them up and
//! writes tag associations.

use serde_json::{Map, Value};

use crate::value_objects::{Channel, CustomerId, TagId, TenantId};

/// Identifier field in a customer's identifier bag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKey {
    LineUserId,
    Psid,
    Email,
    Phone,
}

impl IdentifierKey {
    /// JSON field name inside the identifier bag
    pub fn field_name(self) -> &'static str {
        match self {
            Self::LineUserId => "lineUserId",
            Self::Psid => "psid",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// Key used to find the sender of an inbound message
    pub fn for_inbound(channel: Channel) -> Option<Self> {
        match channel {
            Channel::Line => Some(Self::LineUserId),
            Channel::Messenger => Some(Self::Psid),
            Channel::Email | Channel::Sms => None,
        }
    }

    /// Key used to address a customer resolved from an audience filter
    pub fn for_audience(channel: Channel) -> Self {
        match channel {
            Channel::Email => Self::Email,
            Channel::Sms => Self::Phone,
            Channel::Messenger => Self::Psid,
            Channel::Line => Self::LineUserId,
        }
    }
}

/// Customer as seen by this domain
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub tenant_id: TenantId,
    pub customer_type: Option<String>,
    pub identifiers: Map<String, Value>,
}

impl Customer {
    /// Non-blank identifier value for `key`, trimmed
    pub fn identifier(&self, key: IdentifierKey) -> Option<&str> {
        self.identifiers
            .get(key.field_name())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Filter for customer audience queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub customer_type: Option<String>,
    /// Any-of match; empty means no tag restriction
    pub tag_ids: Vec<TagId>,
    pub limit: usize,
}

/// Result of writing one tag association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAssignment {
    Created,
    AlreadyPresent,
}
