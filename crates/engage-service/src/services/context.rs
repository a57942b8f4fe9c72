//! Service context - dependency container for services
//!
//! Holds every repository and external collaborator the services need.

use std::sync::Arc;

use engage_core::traits::{
    BroadcastRepository, ChannelAccountRepository, ContentStore, CustomerDirectory,
    CustomerTagRepository, HealthCheck, ImmediateRepository, InboundLogRepository,
    OutboxRepository, RuleRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories owned by this engine (rules, logs, outbox, broadcasts, accounts, immediates)
/// - CRM collaborators (customer directory, customer tags, content stores)
/// - A liveness probe for the backing store
#[derive(Clone)]
pub struct ServiceContext {
    // Owned repositories
    rule_repo: Arc<dyn RuleRepository>,
    inbound_log_repo: Arc<dyn InboundLogRepository>,
    outbox_repo: Arc<dyn OutboxRepository>,
    broadcast_repo: Arc<dyn BroadcastRepository>,
    channel_account_repo: Arc<dyn ChannelAccountRepository>,
    immediate_repo: Arc<dyn ImmediateRepository>,

    // External collaborators
    customer_directory: Arc<dyn CustomerDirectory>,
    customer_tag_repo: Arc<dyn CustomerTagRepository>,
    content_store: Arc<dyn ContentStore>,

    health_check: Arc<dyn HealthCheck>,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    /// Get the rule repository
    pub fn rule_repo(&self) -> &dyn RuleRepository {
        self.rule_repo.as_ref()
    }

    /// Get the inbound log repository
    pub fn inbound_log_repo(&self) -> &dyn InboundLogRepository {
        self.inbound_log_repo.as_ref()
    }

    /// Get the outbox repository
    pub fn outbox_repo(&self) -> &dyn OutboxRepository {
        self.outbox_repo.as_ref()
    }

    /// Get the broadcast repository
    pub fn broadcast_repo(&self) -> &dyn BroadcastRepository {
        self.broadcast_repo.as_ref()
    }

    /// Get the channel account repository
    pub fn channel_account_repo(&self) -> &dyn ChannelAccountRepository {
        self.channel_account_repo.as_ref()
    }

    /// Get the immediate message repository
    pub fn immediate_repo(&self) -> &dyn ImmediateRepository {
        self.immediate_repo.as_ref()
    }

    // === Collaborators ===

    pub fn customer_directory(&self) -> &dyn CustomerDirectory {
        self.customer_directory.as_ref()
    }

    pub fn customer_tag_repo(&self) -> &dyn CustomerTagRepository {
        self.customer_tag_repo.as_ref()
    }

    pub fn content_store(&self) -> &dyn ContentStore {
        self.content_store.as_ref()
    }

    pub fn health_check(&self) -> &dyn HealthCheck {
        self.health_check.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("collaborators", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    rule_repo: Option<Arc<dyn RuleRepository>>,
    inbound_log_repo: Option<Arc<dyn InboundLogRepository>>,
    outbox_repo: Option<Arc<dyn OutboxRepository>>,
    broadcast_repo: Option<Arc<dyn BroadcastRepository>>,
    channel_account_repo: Option<Arc<dyn ChannelAccountRepository>>,
    immediate_repo: Option<Arc<dyn ImmediateRepository>>,
    customer_directory: Option<Arc<dyn CustomerDirectory>>,
    customer_tag_repo: Option<Arc<dyn CustomerTagRepository>>,
    content_store: Option<Arc<dyn ContentStore>>,
    health_check: Option<Arc<dyn HealthCheck>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_repo(mut self, repo: Arc<dyn RuleRepository>) -> Self {
        self.rule_repo = Some(repo);
        self
    }

    pub fn inbound_log_repo(mut self, repo: Arc<dyn InboundLogRepository>) -> Self {
        self.inbound_log_repo = Some(repo);
        self
    }

    pub fn outbox_repo(mut self, repo: Arc<dyn OutboxRepository>) -> Self {
        self.outbox_repo = Some(repo);
        self
    }

    pub fn broadcast_repo(mut self, repo: Arc<dyn BroadcastRepository>) -> Self {
        self.broadcast_repo = Some(repo);
        self
    }

    pub fn channel_account_repo(mut self, repo: Arc<dyn ChannelAccountRepository>) -> Self {
        self.channel_account_repo = Some(repo);
        self
    }

    pub fn immediate_repo(mut self, repo: Arc<dyn ImmediateRepository>) -> Self {
        self.immediate_repo = Some(repo);
        self
    }

    pub fn customer_directory(mut self, directory: Arc<dyn CustomerDirectory>) -> Self {
        self.customer_directory = Some(directory);
        self
    }

    pub fn customer_tag_repo(mut self, repo: Arc<dyn CustomerTagRepository>) -> Self {
        self.customer_tag_repo = Some(repo);
        self
    }

    pub fn content_store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.content_store = Some(store);
        self
    }

    pub fn health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_check = Some(check);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            rule_repo: require(self.rule_repo, "rule_repo")?,
            inbound_log_repo: require(self.inbound_log_repo, "inbound_log_repo")?,
            outbox_repo: require(self.outbox_repo, "outbox_repo")?,
            broadcast_repo: require(self.broadcast_repo, "broadcast_repo")?,
            channel_account_repo: require(self.channel_account_repo, "channel_account_repo")?,
            immediate_repo: require(self.immediate_repo, "immediate_repo")?,
            customer_directory: require(self.customer_directory, "customer_directory")?,
            customer_tag_repo: require(self.customer_tag_repo, "customer_tag_repo")?,
            content_store: require(self.content_store, "content_store")?,
            health_check: require(self.health_check, "health_check")?,
        })
    }
}

fn require<T>(dep: Option<T>, name: &str) -> ServiceResult<T> {
    dep.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
}
