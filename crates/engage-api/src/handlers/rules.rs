//! Auto-reply rule handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use engage_service::{
    CreateRuleRequest, InboundDispatcher, PreviewMatchRequest, PreviewMatchResponse,
    RuleResponse, RuleService, UpdateRuleRequest,
};

use crate::extractors::{parse_path_id, ChannelFilter, Tenant, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List rules, optionally for one channel scope
///
/// GET /rules?channel=LINE
pub async fn list_rules(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Query(filter): Query<ChannelFilter>,
) -> ApiResult<Json<Vec<RuleResponse>>> {
    let service = RuleService::new(state.service_context());
    let rules = service.list_rules(tenant_id, filter.channel()).await?;
    Ok(Json(rules))
}

/// Create rule
///
/// POST /rules
pub async fn create_rule(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    ValidatedJson(request): ValidatedJson<CreateRuleRequest>,
) -> ApiResult<Created<Json<RuleResponse>>> {
    let service = RuleService::new(state.service_context());
    let response = service.create_rule(tenant_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get rule by ID
///
/// GET /rules/{rule_id}
pub async fn get_rule(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(rule_id): Path<String>,
) -> ApiResult<Json<RuleResponse>> {
    let rule_id = parse_path_id(&rule_id, "rule_id")?;

    let service = RuleService::new(state.service_context());
    let response = service.get_rule(tenant_id, rule_id).await?;
    Ok(Json(response))
}

/// Update rule
///
/// PATCH /rules/{rule_id}
pub async fn update_rule(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(rule_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRuleRequest>,
) -> ApiResult<Json<RuleResponse>> {
    let rule_id = parse_path_id(&rule_id, "rule_id")?;

    let service = RuleService::new(state.service_context());
    let response = service.update_rule(tenant_id, rule_id, request).await?;
    Ok(Json(response))
}

/// Delete rule
///
/// DELETE /rules/{rule_id}
pub async fn delete_rule(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(rule_id): Path<String>,
) -> ApiResult<NoContent> {
    let rule_id = parse_path_id(&rule_id, "rule_id")?;

    let service = RuleService::new(state.service_context());
    service.delete_rule(tenant_id, rule_id).await?;
    Ok(NoContent)
}

/// Dry-run the matcher against a text
///
/// POST /rules/preview
pub async fn preview_rules(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    ValidatedJson(request): ValidatedJson<PreviewMatchRequest>,
) -> ApiResult<Json<PreviewMatchResponse>> {
    let dispatcher = InboundDispatcher::new(state.service_context());
    let response = dispatcher.preview_match(tenant_id, request).await?;
    Ok(Json(response))
}
