//! Channel account service
//!
//! Handles the per-tenant registry of named channel accounts.

use engage_core::entities::ChannelAccount;
use engage_core::value_objects::{ChannelAccountId, TenantId};
use engage_core::DomainError;
use serde_json::Value;
use tracing::{info, instrument};

use crate::dto::{
    ChannelAccountResponse, CreateChannelAccountRequest, UpdateChannelAccountRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::input;

/// Channel account service
pub struct ChannelAccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelAccountService<'a> {
    /// Create a new ChannelAccountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a channel account
    #[instrument(skip(self, request))]
    pub async fn create_account(
        &self,
        tenant_id: TenantId,
        request: CreateChannelAccountRequest,
    ) -> ServiceResult<ChannelAccountResponse> {
        let channel = input::channel(&request.channel)?;
        let name = input::name(&request.name)?;
        let credentials = credentials(request.credentials)?;

        let mut account = ChannelAccount::new(tenant_id, channel, name, credentials);
        if let Some(enabled) = request.enabled {
            account.enabled = enabled;
        }

        self.ctx.channel_account_repo().create(&account).await?;

        info!(account_id = %account.id, %channel, "Channel account created");

        Ok(ChannelAccountResponse::with_credentials(&account))
    }

    /// Get account by ID, credentials included
    #[instrument(skip(self))]
    pub async fn get_account(
        &self,
        tenant_id: TenantId,
        account_id: ChannelAccountId,
    ) -> ServiceResult<ChannelAccountResponse> {
        let account = self.get_account_entity(tenant_id, account_id).await?;
        Ok(ChannelAccountResponse::with_credentials(&account))
    }

    /// Get account entity by ID
    pub async fn get_account_entity(
        &self,
        tenant_id: TenantId,
        account_id: ChannelAccountId,
    ) -> ServiceResult<ChannelAccount> {
        self.ctx
            .channel_account_repo()
            .find_by_id(tenant_id, account_id)
            .await?
            .ok_or_else(|| DomainError::ChannelAccountNotFound(account_id).into())
    }

    /// List accounts without credentials
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        tenant_id: TenantId,
        channel: Option<&str>,
    ) -> ServiceResult<Vec<ChannelAccountResponse>> {
        let channel = channel.map(input::channel).transpose()?;
        let accounts = self
            .ctx
            .channel_account_repo()
            .list(tenant_id, channel)
            .await?;
        Ok(accounts.iter().map(ChannelAccountResponse::from).collect())
    }

    /// Partially update an account
    #[instrument(skip(self, request))]
    pub async fn update_account(
        &self,
        tenant_id: TenantId,
        account_id: ChannelAccountId,
        request: UpdateChannelAccountRequest,
    ) -> ServiceResult<ChannelAccountResponse> {
        let mut account = self.get_account_entity(tenant_id, account_id).await?;

        if let Some(name) = request.name.as_deref() {
            account.rename(input::name(name)?);
        }
        if request.credentials.is_some() {
            account.set_credentials(credentials(request.credentials)?);
        }
        if let Some(enabled) = request.enabled {
            account.set_enabled(enabled);
        }

        self.ctx.channel_account_repo().update(&account).await?;

        info!(account_id = %account.id, "Channel account updated");

        Ok(ChannelAccountResponse::with_credentials(&account))
    }

    /// Enable or disable an account
    #[instrument(skip(self))]
    pub async fn set_enabled(
        &self,
        tenant_id: TenantId,
        account_id: ChannelAccountId,
        enabled: bool,
    ) -> ServiceResult<ChannelAccountResponse> {
        let mut account = self.get_account_entity(tenant_id, account_id).await?;
        account.set_enabled(enabled);
        self.ctx.channel_account_repo().update(&account).await?;

        info!(account_id = %account.id, enabled, "Channel account toggled");

        Ok(ChannelAccountResponse::from(&account))
    }

    /// Delete an account
    #[instrument(skip(self))]
    pub async fn delete_account(
        &self,
        tenant_id: TenantId,
        account_id: ChannelAccountId,
    ) -> ServiceResult<()> {
        self.ctx
            .channel_account_repo()
            .delete(tenant_id, account_id)
            .await?;

        info!(account_id = %account_id, "Channel account deleted");

        Ok(())
    }
}

/// Credentials must be a JSON object; absent means empty
fn credentials(value: Option<Value>) -> ServiceResult<Value> {
    match value {
        None | Some(Value::Null) => Ok(Value::Object(Default::default())),
        Some(v @ Value::Object(_)) => Ok(v),
        Some(_) => Err(ServiceError::validation("credentials must be a JSON object")),
    }
}
