//! Channel account entity - a named, tenant-scoped channel credential

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::DomainError;
use crate::value_objects::{Channel, ChannelAccountId, TenantId};

/// Channel account (e.g. one LINE OA, one SMTP sender)
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelAccount {
    pub id: ChannelAccountId,
    pub tenant_id: TenantId,
    pub channel: Channel,
    pub name: String,
    /// Opaque provider credentials; never returned in listings
    pub credentials: Value,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChannelAccount {
    /// Create a new enabled account
    pub fn new(tenant_id: TenantId, channel: Channel, name: String, credentials: Value) -> Self {
        let now = Utc::now();
        Self {
            id: ChannelAccountId::new(),
            tenant_id,
            channel,
            name,
            credentials,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check that this account may be used to send on `channel`
    pub fn ensure_usable_for(&self, channel: Channel) -> Result<(), DomainError> {
        if self.channel != channel {
            return Err(DomainError::ChannelAccountMismatch);
        }
        if !self.enabled {
            return Err(DomainError::ChannelAccountDisabled);
        }
        Ok(())
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_credentials(&mut self, credentials: Value) {
        self.credentials = credentials;
        self.updated_at = Utc::now();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.updated_at = Utc::now();
    }
}
