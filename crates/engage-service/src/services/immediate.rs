//! Immediate message service
//!
//! Saved send definitions that can be sent (and re-sent) on demand.

use engage_core::entities::{ImmediateMessage, TemplateKind};
use engage_core::traits::Page;
use engage_core::value_objects::{ImmediateId, TenantId};
use engage_core::{AudienceSpec, DomainError};
use tracing::{info, instrument};

use crate::dto::{
    BroadcastQueuedResponse, CreateImmediateRequest, ImmediateResponse, ImmediateSendResponse,
    UpdateImmediateRequest,
};

use super::broadcast::{BroadcastDraft, BroadcastService};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::input;

/// Immediate message service
pub struct ImmediateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ImmediateService<'a> {
    /// Create a new ImmediateService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Save a new draft
    #[instrument(skip(self, request))]
    pub async fn create_immediate(
        &self,
        tenant_id: TenantId,
        request: CreateImmediateRequest,
    ) -> ServiceResult<ImmediateResponse> {
        let channel = input::channel(&request.channel)?;
        let template_kind = input::template_kind(&request.template_kind)?;
        check_audience(&request.audience)?;

        let mut immediate = ImmediateMessage::new(
            tenant_id,
            input::name(&request.name)?,
            channel,
            template_kind,
            request.audience,
        );
        immediate.channel_account_id =
            input::optional_id("channelAccountId", request.channel_account_id.as_deref())?;
        immediate.template_id = input::optional_id("templateId", request.template_id.as_deref())?;
        immediate.payload = request.payload;
        check_template(&immediate)?;

        self.ctx.immediate_repo().create(&immediate).await?;

        info!(immediate_id = %immediate.id, %channel, "Immediate message created");

        Ok(ImmediateResponse::from(&immediate))
    }

    /// Get immediate message by ID
    #[instrument(skip(self))]
    pub async fn get_immediate(
        &self,
        tenant_id: TenantId,
        immediate_id: ImmediateId,
    ) -> ServiceResult<ImmediateResponse> {
        let immediate = self.get_immediate_entity(tenant_id, immediate_id).await?;
        Ok(ImmediateResponse::from(&immediate))
    }

    /// Get immediate message entity by ID
    pub async fn get_immediate_entity(
        &self,
        tenant_id: TenantId,
        immediate_id: ImmediateId,
    ) -> ServiceResult<ImmediateMessage> {
        self.ctx
            .immediate_repo()
            .find_by_id(tenant_id, immediate_id)
            .await?
            .ok_or_else(|| DomainError::ImmediateNotFound(immediate_id).into())
    }

    /// List immediate messages, newest first
    #[instrument(skip(self))]
    pub async fn list_immediates(
        &self,
        tenant_id: TenantId,
        page: Page,
    ) -> ServiceResult<Vec<ImmediateResponse>> {
        let immediates = self.ctx.immediate_repo().list(tenant_id, page).await?;
        Ok(immediates.iter().map(ImmediateResponse::from).collect())
    }

    /// Partially update a definition; its status is left alone
    #[instrument(skip(self, request))]
    pub async fn update_immediate(
        &self,
        tenant_id: TenantId,
        immediate_id: ImmediateId,
        request: UpdateImmediateRequest,
    ) -> ServiceResult<ImmediateResponse> {
        let mut immediate = self.get_immediate_entity(tenant_id, immediate_id).await?;

        if let Some(name) = request.name.as_deref() {
            immediate.name = input::name(name)?;
        }
        if let Some(channel) = request.channel.as_deref() {
            immediate.channel = input::channel(channel)?;
        }
        if let Some(account_id) = request.channel_account_id.as_deref() {
            immediate.channel_account_id = input::optional_id("channelAccountId", Some(account_id))?;
        }
        if let Some(kind) = request.template_kind.as_deref() {
            immediate.template_kind = input::template_kind(kind)?;
            if immediate.template_kind == TemplateKind::Raw {
                immediate.template_id = None;
            }
        }
        if let Some(template_id) = request.template_id.as_deref() {
            immediate.template_id = input::optional_id("templateId", Some(template_id))?;
        }
        if request.payload.is_some() {
            immediate.payload = request.payload;
        }
        if let Some(audience) = request.audience {
            check_audience(&audience)?;
            immediate.audience = audience;
        }
        check_template(&immediate)?;
        immediate.touch();

        self.ctx.immediate_repo().update(&immediate).await?;

        info!(immediate_id = %immediate.id, "Immediate message updated");

        Ok(ImmediateResponse::from(&immediate))
    }

    /// Delete a definition; broadcasts already sent from it are kept
    #[instrument(skip(self))]
    pub async fn delete_immediate(
        &self,
        tenant_id: TenantId,
        immediate_id: ImmediateId,
    ) -> ServiceResult<()> {
        self.ctx.immediate_repo().delete(tenant_id, immediate_id).await?;

        info!(immediate_id = %immediate_id, "Immediate message deleted");

        Ok(())
    }

    /// Send the definition as a new broadcast.
    ///
    /// Every call creates another broadcast; the definition moves to SENT on
    /// the first success and stays there.
    #[instrument(skip(self))]
    pub async fn send_immediate(
        &self,
        tenant_id: TenantId,
        immediate_id: ImmediateId,
    ) -> ServiceResult<ImmediateSendResponse> {
        let mut immediate = self.get_immediate_entity(tenant_id, immediate_id).await?;

        let mut draft = BroadcastDraft::new(immediate.channel, immediate.template_kind);
        draft.channel_account_id = immediate.channel_account_id;
        draft.template_id = immediate.template_id;
        draft.payload = immediate.payload.clone();
        draft.audience = Some(immediate.audience.clone());
        draft.immediate_id = Some(immediate.id);

        let broadcast = BroadcastService::new(self.ctx)
            .send_draft(tenant_id, draft)
            .await?;

        immediate.mark_sent(broadcast.id);
        self.ctx.immediate_repo().update(&immediate).await?;

        info!(immediate_id = %immediate.id, broadcast_id = %broadcast.id, "Immediate message sent");

        Ok(ImmediateSendResponse {
            immediate: ImmediateResponse::from(&immediate),
            broadcast: BroadcastQueuedResponse::new(
                broadcast.id.to_string(),
                broadcast.stats.queued,
            ),
        })
    }
}

fn check_audience(audience: &AudienceSpec) -> ServiceResult<()> {
    audience.parsed_mode()?;
    Ok(())
}

/// Content kinds need a template id; RAW never keeps one
fn check_template(immediate: &ImmediateMessage) -> ServiceResult<()> {
    match immediate.template_kind {
        TemplateKind::Raw if immediate.template_id.is_some() => Err(ServiceError::validation(
            "templateId must not be set for RAW templates",
        )),
        TemplateKind::Raw => Ok(()),
        kind if immediate.template_id.is_none() => Err(ServiceError::validation(format!(
            "templateId is required for {kind} templates"
        ))),
        _ => Ok(()),
    }
}
