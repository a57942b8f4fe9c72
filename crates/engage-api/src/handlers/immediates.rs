//! Immediate message handlers

use axum::{
    extract::{Path, State},
    Json,
};
use engage_service::{
    CreateImmediateRequest, ImmediateResponse, ImmediateSendResponse, ImmediateService,
    UpdateImmediateRequest,
};

use crate::extractors::{parse_path_id, Pagination, Tenant, ValidatedJson};
use crate::response::{Accepted, ApiResult, Created, NoContent};
use crate::state::AppState;

/// List immediate messages
///
/// GET /immediates?limit=&offset=
pub async fn list_immediates(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<ImmediateResponse>>> {
    let service = ImmediateService::new(state.service_context());
    let immediates = service.list_immediates(tenant_id, page).await?;
    Ok(Json(immediates))
}

/// Save a draft
///
/// POST /immediates
pub async fn create_immediate(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    ValidatedJson(request): ValidatedJson<CreateImmediateRequest>,
) -> ApiResult<Created<Json<ImmediateResponse>>> {
    let service = ImmediateService::new(state.service_context());
    let response = service.create_immediate(tenant_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get immediate message by ID
///
/// GET /immediates/{immediate_id}
pub async fn get_immediate(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(immediate_id): Path<String>,
) -> ApiResult<Json<ImmediateResponse>> {
    let immediate_id = parse_path_id(&immediate_id, "immediate_id")?;

    let service = ImmediateService::new(state.service_context());
    let response = service.get_immediate(tenant_id, immediate_id).await?;
    Ok(Json(response))
}

/// Update immediate message
///
/// PATCH /immediates/{immediate_id}
pub async fn update_immediate(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(immediate_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateImmediateRequest>,
) -> ApiResult<Json<ImmediateResponse>> {
    let immediate_id = parse_path_id(&immediate_id, "immediate_id")?;

    let service = ImmediateService::new(state.service_context());
    let response = service
        .update_immediate(tenant_id, immediate_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete immediate message
///
/// DELETE /immediates/{immediate_id}
pub async fn delete_immediate(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(immediate_id): Path<String>,
) -> ApiResult<NoContent> {
    let immediate_id = parse_path_id(&immediate_id, "immediate_id")?;

    let service = ImmediateService::new(state.service_context());
    service.delete_immediate(tenant_id, immediate_id).await?;
    Ok(NoContent)
}

/// Send the saved definition as a new broadcast
///
/// POST /immediates/{immediate_id}/send
pub async fn send_immediate(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(immediate_id): Path<String>,
) -> ApiResult<Accepted<Json<ImmediateSendResponse>>> {
    let immediate_id = parse_path_id(&immediate_id, "immediate_id")?;

    let service = ImmediateService::new(state.service_context());
    let response = service.send_immediate(tenant_id, immediate_id).await?;
    Ok(Accepted(Json(response)))
}
