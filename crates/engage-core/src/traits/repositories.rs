//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every call is scoped by tenant; a record owned
//! by another tenant is indistinguishable from a missing one.

use async_trait::async_trait;

use crate::entities::{
    Broadcast, BroadcastStats, ChannelAccount, ContentKind, ContentObject, Customer,
    CustomerFilter, Delivery, DeliveryStatus, IdentifierKey, ImmediateMessage, InboundLog,
    OutboxEntry, Rule, TagAssignment,
};
use crate::error::DomainError;
use crate::value_objects::{
    BroadcastId, Channel, ChannelAccountId, ContentId, CustomerId, DeliveryId, ImmediateId,
    InboundLogId, OutboxEntryId, RuleChannel, RuleId, TagId, TenantId,
};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset pagination for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    /// Clamp caller supplied values into a valid page
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// ============================================================================
// Rule Repository
// ============================================================================

#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Find rule by ID
    async fn find_by_id(&self, tenant_id: TenantId, id: RuleId) -> RepoResult<Option<Rule>>;

    /// List rules, optionally restricted to one channel scope
    async fn list(&self, tenant_id: TenantId, channel: Option<RuleChannel>)
        -> RepoResult<Vec<Rule>>;

    /// Active rules saved under `channel`
    async fn find_active_by_channel(
        &self,
        tenant_id: TenantId,
        channel: RuleChannel,
    ) -> RepoResult<Vec<Rule>>;

    /// Active `ALL`-channel rules of kind `LABEL_KEYWORDS`
    async fn find_active_global_labels(&self, tenant_id: TenantId) -> RepoResult<Vec<Rule>>;

    /// Check whether a name is taken within tenant + channel, ignoring `exclude`
    async fn name_exists(
        &self,
        tenant_id: TenantId,
        channel: RuleChannel,
        name: &str,
        exclude: Option<RuleId>,
    ) -> RepoResult<bool>;

    /// Create a new rule
    async fn create(&self, rule: &Rule) -> RepoResult<()>;

    /// Update an existing rule
    async fn update(&self, rule: &Rule) -> RepoResult<()>;

    /// Hard delete a rule
    async fn delete(&self, tenant_id: TenantId, id: RuleId) -> RepoResult<()>;
}

// ============================================================================
// Inbound Log Repository
// ============================================================================

#[async_trait]
pub trait InboundLogRepository: Send + Sync {
    /// Persist one evaluation record
    async fn create(&self, log: &InboundLog) -> RepoResult<()>;

    /// Find log by ID
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: InboundLogId,
    ) -> RepoResult<Option<InboundLog>>;
}

// ============================================================================
// Outbox Repository
// ============================================================================

#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Queue a reply
    async fn create(&self, entry: &OutboxEntry) -> RepoResult<()>;

    /// Find entry by ID
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: OutboxEntryId,
    ) -> RepoResult<Option<OutboxEntry>>;

    /// Pending entries, oldest first
    async fn list_pending(&self, tenant_id: TenantId, limit: i64) -> RepoResult<Vec<OutboxEntry>>;
}

// ============================================================================
// Broadcast Repository
// ============================================================================

#[async_trait]
pub trait BroadcastRepository: Send + Sync {
    /// Persist a broadcast and all of its deliveries atomically
    async fn create_with_deliveries(
        &self,
        broadcast: &Broadcast,
        deliveries: &[Delivery],
    ) -> RepoResult<()>;

    /// Find broadcast by ID
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: BroadcastId,
    ) -> RepoResult<Option<Broadcast>>;

    /// List broadcasts, newest first
    async fn list(&self, tenant_id: TenantId, page: Page) -> RepoResult<Vec<Broadcast>>;

    /// List deliveries of one broadcast, optionally by status
    async fn list_deliveries(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
        status: Option<DeliveryStatus>,
        page: Page,
    ) -> RepoResult<Vec<Delivery>>;

    /// Find delivery by ID
    async fn find_delivery(
        &self,
        tenant_id: TenantId,
        id: DeliveryId,
    ) -> RepoResult<Option<Delivery>>;

    /// Persist a delivery transition if the stored row is still `QUEUED`.
    ///
    /// Returns `false` when another writer already moved it.
    async fn update_delivery_if_queued(&self, delivery: &Delivery) -> RepoResult<bool>;

    /// Count deliveries per status for one broadcast
    async fn count_deliveries_by_status(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
    ) -> RepoResult<Vec<(DeliveryStatus, i64)>>;

    /// Overwrite the stored stats snapshot
    async fn update_stats(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
        stats: &BroadcastStats,
    ) -> RepoResult<()>;
}

// ============================================================================
// Channel Account Repository
// ============================================================================

#[async_trait]
pub trait ChannelAccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ChannelAccountId,
    ) -> RepoResult<Option<ChannelAccount>>;

    /// List accounts, optionally for one channel
    async fn list(
        &self,
        tenant_id: TenantId,
        channel: Option<Channel>,
    ) -> RepoResult<Vec<ChannelAccount>>;

    /// Oldest enabled account for a channel
    async fn find_first_enabled(
        &self,
        tenant_id: TenantId,
        channel: Channel,
    ) -> RepoResult<Option<ChannelAccount>>;

    /// Create a new account
    async fn create(&self, account: &ChannelAccount) -> RepoResult<()>;

    /// Update an existing account
    async fn update(&self, account: &ChannelAccount) -> RepoResult<()>;

    /// Hard delete an account
    async fn delete(&self, tenant_id: TenantId, id: ChannelAccountId) -> RepoResult<()>;
}

// ============================================================================
// Immediate Message Repository
// ============================================================================

#[async_trait]
pub trait ImmediateRepository: Send + Sync {
    /// Find immediate message by ID
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: ImmediateId,
    ) -> RepoResult<Option<ImmediateMessage>>;

    /// List immediate messages, newest first
    async fn list(&self, tenant_id: TenantId, page: Page) -> RepoResult<Vec<ImmediateMessage>>;

    /// Create a new immediate message
    async fn create(&self, immediate: &ImmediateMessage) -> RepoResult<()>;

    /// Update an existing immediate message
    async fn update(&self, immediate: &ImmediateMessage) -> RepoResult<()>;

    /// Hard delete an immediate message
    async fn delete(&self, tenant_id: TenantId, id: ImmediateId) -> RepoResult<()>;
}

// ============================================================================
// External collaborators
// ============================================================================

/// Read access to the CRM customer directory
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Exact match on one identifier field
    async fn find_by_identifier(
        &self,
        tenant_id: TenantId,
        key: IdentifierKey,
        value: &str,
    ) -> RepoResult<Option<Customer>>;

    /// Customers matching a filter, at most `filter.limit`
    async fn list_by_filter(
        &self,
        tenant_id: TenantId,
        filter: &CustomerFilter,
    ) -> RepoResult<Vec<Customer>>;
}

/// Customer-tag associations
#[async_trait]
pub trait CustomerTagRepository: Send + Sync {
    /// Attach a tag; an existing association is reported, not an error
    async fn assign(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        tag_id: &TagId,
    ) -> RepoResult<TagAssignment>;
}

/// Read access to the per-channel content stores
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        kind: ContentKind,
        id: ContentId,
    ) -> RepoResult<Option<ContentObject>>;
}

/// Backing store liveness probe
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> RepoResult<()>;
}
