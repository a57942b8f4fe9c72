//! Inbound webhook handler

use axum::{
    extract::{Path, State},
    Json,
};
use engage_service::{InboundDispatcher, InboundMessageRequest, InboundResultResponse};

use crate::extractors::{Tenant, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Run one parsed inbound message through the rule set.
///
/// Partial tag write failures are reported in the body; the status stays 200.
///
/// POST /inbound/{channel}
pub async fn receive_inbound(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(channel): Path<String>,
    ValidatedJson(request): ValidatedJson<InboundMessageRequest>,
) -> ApiResult<Json<InboundResultResponse>> {
    let dispatcher = InboundDispatcher::new(state.service_context());
    let response = dispatcher
        .handle_request(tenant_id, &channel, request)
        .await?;
    Ok(Json(response))
}
