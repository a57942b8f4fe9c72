//! Broadcast handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use engage_service::{
    AudienceEstimateResponse, AudienceResolver, BroadcastQueuedResponse, BroadcastResponse,
    BroadcastService, BroadcastStatsResponse, DeliveryResponse, EstimateAudienceRequest,
    SendBroadcastRequest,
};

use crate::extractors::{parse_path_id, DeliveryFilter, Pagination, Tenant, ValidatedJson};
use crate::response::{Accepted, ApiResult};
use crate::state::AppState;

/// Queue a broadcast; deliveries are picked up by the external worker
///
/// POST /broadcasts
pub async fn send_broadcast(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    ValidatedJson(request): ValidatedJson<SendBroadcastRequest>,
) -> ApiResult<Accepted<Json<BroadcastQueuedResponse>>> {
    let service = BroadcastService::new(state.service_context());
    let response = service.send(tenant_id, request).await?;
    Ok(Accepted(Json(response)))
}

/// List broadcasts, newest first
///
/// GET /broadcasts?limit=&offset=
pub async fn list_broadcasts(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<BroadcastResponse>>> {
    let service = BroadcastService::new(state.service_context());
    let broadcasts = service.list_broadcasts(tenant_id, page).await?;
    Ok(Json(broadcasts))
}

/// Get broadcast by ID
///
/// GET /broadcasts/{broadcast_id}
pub async fn get_broadcast(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(broadcast_id): Path<String>,
) -> ApiResult<Json<BroadcastResponse>> {
    let broadcast_id = parse_path_id(&broadcast_id, "broadcast_id")?;

    let service = BroadcastService::new(state.service_context());
    let response = service.get_broadcast(tenant_id, broadcast_id).await?;
    Ok(Json(response))
}

/// List deliveries of a broadcast
///
/// GET /broadcasts/{broadcast_id}/deliveries?status=&limit=&offset=
pub async fn list_deliveries(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(broadcast_id): Path<String>,
    Query(filter): Query<DeliveryFilter>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<DeliveryResponse>>> {
    let broadcast_id = parse_path_id(&broadcast_id, "broadcast_id")?;

    let service = BroadcastService::new(state.service_context());
    let deliveries = service
        .list_deliveries(tenant_id, broadcast_id, filter.status(), page)
        .await?;
    Ok(Json(deliveries))
}

/// Delivery counts aggregated from the delivery rows
///
/// GET /broadcasts/{broadcast_id}/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(broadcast_id): Path<String>,
) -> ApiResult<Json<BroadcastStatsResponse>> {
    let broadcast_id = parse_path_id(&broadcast_id, "broadcast_id")?;

    let service = BroadcastService::new(state.service_context());
    let stats = service.delivery_stats(tenant_id, broadcast_id).await?;
    Ok(Json(stats))
}

/// Size an audience without creating anything
///
/// POST /broadcasts/estimate
pub async fn estimate_audience(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    ValidatedJson(request): ValidatedJson<EstimateAudienceRequest>,
) -> ApiResult<Json<AudienceEstimateResponse>> {
    let resolver = AudienceResolver::new(state.service_context());
    let response = resolver.estimate(tenant_id, request).await?;
    Ok(Json(response))
}
