//! Delivery outcome handler used by the delivery worker

use axum::{
    extract::{Path, State},
    Json,
};
use engage_service::{BroadcastService, DeliveryOutcomeRequest, DeliveryResponse};

use crate::extractors::{parse_path_id, Tenant, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Report SENT or FAILED for a queued delivery
///
/// POST /deliveries/{delivery_id}/outcome
pub async fn report_outcome(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(delivery_id): Path<String>,
    ValidatedJson(request): ValidatedJson<DeliveryOutcomeRequest>,
) -> ApiResult<Json<DeliveryResponse>> {
    let delivery_id = parse_path_id(&delivery_id, "delivery_id")?;

    let service = BroadcastService::new(state.service_context());
    let response = service
        .report_outcome(tenant_id, delivery_id, request)
        .await?;
    Ok(Json(response))
}
