//! Broadcast service
//!
//! Fans one send out to a delivery row per destination and keeps broadcast
//! stats in step with the outcomes reported by the delivery worker.

use engage_core::audience::{dedup_destinations, ensure_sendable};
use engage_core::entities::{Broadcast, BroadcastStats, TemplateKind};
use engage_core::events::DeliveryStatusUpdated;
use engage_core::traits::Page;
use engage_core::value_objects::{
    BroadcastId, CampaignId, Channel, ChannelAccountId, ContentId, DeliveryId, ImmediateId,
    TenantId,
};
use engage_core::{AudienceSpec, DomainError};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::dto::{
    BroadcastQueuedResponse, BroadcastResponse, BroadcastStatsResponse, DeliveryOutcomeRequest,
    DeliveryResponse, SendBroadcastRequest,
};

use super::audience::AudienceResolver;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::input;
use super::template::TemplateResolver;

/// A parsed send request
#[derive(Debug, Clone)]
pub struct BroadcastDraft {
    pub channel: Channel,
    pub channel_account_id: Option<ChannelAccountId>,
    pub template_kind: TemplateKind,
    pub template_id: Option<ContentId>,
    pub payload: Option<Value>,
    /// Explicit destinations; a non-empty list wins over `audience`
    pub destinations: Option<Vec<String>>,
    pub audience: Option<AudienceSpec>,
    pub metadata: Option<Value>,
    pub immediate_id: Option<ImmediateId>,
    pub campaign_id: Option<CampaignId>,
}

impl BroadcastDraft {
    pub fn new(channel: Channel, template_kind: TemplateKind) -> Self {
        Self {
            channel,
            channel_account_id: None,
            template_kind,
            template_id: None,
            payload: None,
            destinations: None,
            audience: None,
            metadata: None,
            immediate_id: None,
            campaign_id: None,
        }
    }

    /// Parse the string-typed fields of a send request
    pub fn from_request(request: SendBroadcastRequest) -> ServiceResult<Self> {
        Ok(Self {
            channel: input::channel(&request.channel)?,
            channel_account_id: input::optional_id(
                "channelAccountId",
                request.channel_account_id.as_deref(),
            )?,
            template_kind: input::template_kind(&request.template_kind)?,
            template_id: input::optional_id("templateId", request.template_id.as_deref())?,
            payload: request.payload,
            destinations: request.destinations,
            audience: request.audience,
            metadata: request.metadata,
            immediate_id: input::optional_id("immediateId", request.immediate_id.as_deref())?,
            campaign_id: input::optional_id("campaignId", request.campaign_id.as_deref())?,
        })
    }
}

/// Broadcast service
pub struct BroadcastService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BroadcastService<'a> {
    /// Create a new BroadcastService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Queue a broadcast from an API request
    pub async fn send(
        &self,
        tenant_id: TenantId,
        request: SendBroadcastRequest,
    ) -> ServiceResult<BroadcastQueuedResponse> {
        let draft = BroadcastDraft::from_request(request)?;
        let broadcast = self.send_draft(tenant_id, draft).await?;
        Ok(BroadcastQueuedResponse::new(
            broadcast.id.to_string(),
            broadcast.stats.queued,
        ))
    }

    /// Resolve, validate and persist one broadcast with its deliveries.
    ///
    /// Nothing is written unless every check passes; no transport is called.
    #[instrument(skip(self, draft), fields(channel = %draft.channel, kind = %draft.template_kind))]
    pub async fn send_draft(
        &self,
        tenant_id: TenantId,
        draft: BroadcastDraft,
    ) -> ServiceResult<Broadcast> {
        let template = TemplateResolver::new(self.ctx)
            .resolve(tenant_id, draft.template_kind, draft.template_id, draft.payload)
            .await?;

        if let Some(account_id) = draft.channel_account_id {
            let account = self
                .ctx
                .channel_account_repo()
                .find_by_id(tenant_id, account_id)
                .await?
                .ok_or(DomainError::ChannelAccountNotFound(account_id))?;
            account.ensure_usable_for(draft.channel)?;
        }

        let explicit = draft
            .destinations
            .as_deref()
            .map(dedup_destinations)
            .filter(|d| !d.is_empty());
        let destinations = match (explicit, &draft.audience) {
            (Some(destinations), _) => destinations,
            (None, Some(audience)) => {
                AudienceResolver::new(self.ctx)
                    .resolve(tenant_id, draft.channel, audience)
                    .await?
            }
            (None, None) => Vec::new(),
        };
        ensure_sendable(destinations.len())?;

        let mut broadcast = Broadcast::new(
            tenant_id,
            draft.channel,
            template.kind,
            template.template_id,
            template.payload,
            destinations.len(),
        );
        broadcast.channel_account_id = draft.channel_account_id;
        broadcast.immediate_id = draft.immediate_id;
        broadcast.campaign_id = draft.campaign_id;
        if let Some(metadata) = draft.metadata {
            broadcast.metadata = metadata;
        }

        let deliveries = broadcast.deliveries_for(&destinations);
        self.ctx
            .broadcast_repo()
            .create_with_deliveries(&broadcast, &deliveries)
            .await?;

        info!(
            broadcast_id = %broadcast.id,
            queued = deliveries.len(),
            "Broadcast queued"
        );

        Ok(broadcast)
    }

    /// Get broadcast by ID
    #[instrument(skip(self))]
    pub async fn get_broadcast(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
    ) -> ServiceResult<BroadcastResponse> {
        let broadcast = self.get_broadcast_entity(tenant_id, broadcast_id).await?;
        Ok(BroadcastResponse::from(&broadcast))
    }

    /// Get broadcast entity by ID
    pub async fn get_broadcast_entity(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
    ) -> ServiceResult<Broadcast> {
        self.ctx
            .broadcast_repo()
            .find_by_id(tenant_id, broadcast_id)
            .await?
            .ok_or_else(|| DomainError::BroadcastNotFound(broadcast_id).into())
    }

    /// List broadcasts, newest first
    #[instrument(skip(self))]
    pub async fn list_broadcasts(
        &self,
        tenant_id: TenantId,
        page: Page,
    ) -> ServiceResult<Vec<BroadcastResponse>> {
        let broadcasts = self.ctx.broadcast_repo().list(tenant_id, page).await?;
        Ok(broadcasts.iter().map(BroadcastResponse::from).collect())
    }

    /// List deliveries of one broadcast, optionally by status
    #[instrument(skip(self))]
    pub async fn list_deliveries(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
        status: Option<&str>,
        page: Page,
    ) -> ServiceResult<Vec<DeliveryResponse>> {
        let status = status.map(input::delivery_status).transpose()?;
        self.get_broadcast_entity(tenant_id, broadcast_id).await?;

        let deliveries = self
            .ctx
            .broadcast_repo()
            .list_deliveries(tenant_id, broadcast_id, status, page)
            .await?;
        Ok(deliveries.iter().map(DeliveryResponse::from).collect())
    }

    /// Aggregate delivery counts straight from the delivery rows
    #[instrument(skip(self))]
    pub async fn delivery_stats(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
    ) -> ServiceResult<BroadcastStatsResponse> {
        self.get_broadcast_entity(tenant_id, broadcast_id).await?;
        let stats = self.aggregate(tenant_id, broadcast_id).await?;
        Ok(stats.into())
    }

    /// Apply a worker-reported outcome and refresh the broadcast stats.
    ///
    /// Only a queued delivery may move; a second report for the same delivery
    /// is rejected as an invalid transition.
    #[instrument(skip(self, event), fields(delivery_id = %event.delivery_id, status = %event.status))]
    pub async fn record_delivery_outcome(
        &self,
        tenant_id: TenantId,
        event: DeliveryStatusUpdated,
    ) -> ServiceResult<DeliveryResponse> {
        let outcome = event.outcome()?;
        let mut delivery = self
            .ctx
            .broadcast_repo()
            .find_delivery(tenant_id, event.delivery_id)
            .await?
            .ok_or(DomainError::DeliveryNotFound(event.delivery_id))?;

        let to = outcome.status();
        delivery.transition(outcome)?;

        if !self
            .ctx
            .broadcast_repo()
            .update_delivery_if_queued(&delivery)
            .await?
        {
            // Another report won the race
            let current = self
                .ctx
                .broadcast_repo()
                .find_delivery(tenant_id, delivery.id)
                .await?
                .ok_or(DomainError::DeliveryNotFound(delivery.id))?;
            return Err(DomainError::InvalidDeliveryTransition {
                from: current.status,
                to,
            }
            .into());
        }

        let stats = self.aggregate(tenant_id, delivery.broadcast_id).await?;
        self.ctx
            .broadcast_repo()
            .update_stats(tenant_id, delivery.broadcast_id, &stats)
            .await?;

        debug!(
            broadcast_id = %delivery.broadcast_id,
            sent = stats.sent,
            failed = stats.failed,
            queued = stats.queued,
            "Broadcast stats refreshed"
        );

        Ok(DeliveryResponse::from(&delivery))
    }

    /// Record an outcome posted for the delivery at `delivery_id`
    pub async fn report_outcome(
        &self,
        tenant_id: TenantId,
        delivery_id: DeliveryId,
        request: DeliveryOutcomeRequest,
    ) -> ServiceResult<DeliveryResponse> {
        let event = DeliveryStatusUpdated {
            delivery_id,
            status: input::delivery_status(&request.status)?,
            error_message: request.error_message,
            occurred_at: chrono::Utc::now(),
        };
        self.record_delivery_outcome(tenant_id, event).await
    }

    async fn aggregate(
        &self,
        tenant_id: TenantId,
        broadcast_id: BroadcastId,
    ) -> ServiceResult<BroadcastStats> {
        let counts = self
            .ctx
            .broadcast_repo()
            .count_deliveries_by_status(tenant_id, broadcast_id)
            .await?;
        Ok(BroadcastStats::from_counts(counts))
    }
}
