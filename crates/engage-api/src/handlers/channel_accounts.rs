//! Channel account handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use engage_service::{
    ChannelAccountResponse, ChannelAccountService, CreateChannelAccountRequest,
    SetEnabledRequest, UpdateChannelAccountRequest,
};

use crate::extractors::{parse_path_id, ChannelFilter, Tenant, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List accounts (credentials omitted)
///
/// GET /channel-accounts?channel=EMAIL
pub async fn list_accounts(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Query(filter): Query<ChannelFilter>,
) -> ApiResult<Json<Vec<ChannelAccountResponse>>> {
    let service = ChannelAccountService::new(state.service_context());
    let accounts = service.list_accounts(tenant_id, filter.channel()).await?;
    Ok(Json(accounts))
}

/// Register account
///
/// POST /channel-accounts
pub async fn create_account(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    ValidatedJson(request): ValidatedJson<CreateChannelAccountRequest>,
) -> ApiResult<Created<Json<ChannelAccountResponse>>> {
    let service = ChannelAccountService::new(state.service_context());
    let response = service.create_account(tenant_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get account by ID
///
/// GET /channel-accounts/{account_id}
pub async fn get_account(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(account_id): Path<String>,
) -> ApiResult<Json<ChannelAccountResponse>> {
    let account_id = parse_path_id(&account_id, "account_id")?;

    let service = ChannelAccountService::new(state.service_context());
    let response = service.get_account(tenant_id, account_id).await?;
    Ok(Json(response))
}

/// Update account
///
/// PATCH /channel-accounts/{account_id}
pub async fn update_account(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(account_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateChannelAccountRequest>,
) -> ApiResult<Json<ChannelAccountResponse>> {
    let account_id = parse_path_id(&account_id, "account_id")?;

    let service = ChannelAccountService::new(state.service_context());
    let response = service
        .update_account(tenant_id, account_id, request)
        .await?;
    Ok(Json(response))
}

/// Enable or disable account
///
/// PUT /channel-accounts/{account_id}/enabled
pub async fn set_enabled(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(account_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetEnabledRequest>,
) -> ApiResult<Json<ChannelAccountResponse>> {
    let account_id = parse_path_id(&account_id, "account_id")?;

    let service = ChannelAccountService::new(state.service_context());
    let response = service
        .set_enabled(tenant_id, account_id, request.enabled)
        .await?;
    Ok(Json(response))
}

/// Delete account
///
/// DELETE /channel-accounts/{account_id}
pub async fn delete_account(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(account_id): Path<String>,
) -> ApiResult<NoContent> {
    let account_id = parse_path_id(&account_id, "account_id")?;

    let service = ChannelAccountService::new(state.service_context());
    service.delete_account(tenant_id, account_id).await?;
    Ok(NoContent)
}
