//! Route definitions
//!
//! All API routes organized by resource and mounted under /api/v1.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{
    broadcasts, channel_accounts, deliveries, health, immediates, inbound, rules,
};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(rule_routes())
        .merge(inbound_routes())
        .merge(channel_account_routes())
        .merge(broadcast_routes())
        .merge(immediate_routes())
}

/// Auto-reply rule routes
fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/rules", get(rules::list_rules).post(rules::create_rule))
        .route("/rules/preview", post(rules::preview_rules))
        .route(
            "/rules/:rule_id",
            get(rules::get_rule)
                .patch(rules::update_rule)
                .delete(rules::delete_rule),
        )
}

/// Inbound webhook routes
fn inbound_routes() -> Router<AppState> {
    Router::new().route("/inbound/:channel", post(inbound::receive_inbound))
}

/// Channel account routes
fn channel_account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/channel-accounts",
            get(channel_accounts::list_accounts).post(channel_accounts::create_account),
        )
        .route(
            "/channel-accounts/:account_id",
            get(channel_accounts::get_account)
                .patch(channel_accounts::update_account)
                .delete(channel_accounts::delete_account),
        )
        .route(
            "/channel-accounts/:account_id/enabled",
            put(channel_accounts::set_enabled).patch(channel_accounts::set_enabled),
        )
}

/// Broadcast and delivery routes
fn broadcast_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/broadcasts",
            get(broadcasts::list_broadcasts).post(broadcasts::send_broadcast),
        )
        .route("/broadcasts/estimate", post(broadcasts::estimate_audience))
        .route("/broadcasts/:broadcast_id", get(broadcasts::get_broadcast))
        .route(
            "/broadcasts/:broadcast_id/deliveries",
            get(broadcasts::list_deliveries),
        )
        .route("/broadcasts/:broadcast_id/stats", get(broadcasts::get_stats))
        .route(
            "/deliveries/:delivery_id/outcome",
            post(deliveries::report_outcome),
        )
}

/// Immediate message routes
fn immediate_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/immediates",
            get(immediates::list_immediates).post(immediates::create_immediate),
        )
        .route(
            "/immediates/:immediate_id",
            get(immediates::get_immediate)
                .patch(immediates::update_immediate)
                .delete(immediates::delete_immediate),
        )
        .route("/immediates/:immediate_id/send", post(immediates::send_immediate))
}
