//! Audience, broadcast and delivery tests
//!
//! Run with: cargo test -p integration-tests --test broadcast_tests

use engage_core::entities::{ContentKind, DeliveryStatus};
use engage_core::value_objects::{BroadcastId, DeliveryId, TenantId};
use engage_core::{DomainError, MAX_AUDIENCE_SIZE};
use engage_service::{
    AudienceResolver, BroadcastQueuedResponse, BroadcastService, ChannelAccountService,
    ServiceContext, ESTIMATE_SAMPLE_SIZE,
};
use integration_tests::{fixtures::*, MemoryStore};
use serde_json::json;

async fn send(ctx: &ServiceContext, tenant: TenantId, body: serde_json::Value) -> BroadcastQueuedResponse {
    BroadcastService::new(ctx).send(tenant, request(body)).await.unwrap()
}

fn broadcast_id(queued: &BroadcastQueuedResponse) -> BroadcastId {
    queued.broadcast_id.parse().unwrap()
}

fn estimate_body(channel: &str, audience: serde_json::Value) -> serde_json::Value {
    json!({ "channel": channel, "audience": audience })
}

// ============================================================================
// Audience
// ============================================================================

#[tokio::test]
async fn test_manual_audience_dedups_case_insensitively() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);

    let audience = manual_audience(&[
        "a@x.com".to_string(),
        "A@x.com".to_string(),
        " b@x.com ".to_string(),
        String::new(),
    ]);
    let estimate = AudienceResolver::new(&ctx)
        .estimate(TenantId::new(), request(estimate_body("EMAIL", audience)))
        .await
        .unwrap();

    assert_eq!(estimate.count, 2);
    assert_eq!(estimate.sample, vec!["a@x.com", "b@x.com"]);
}

#[tokio::test]
async fn test_audience_size_limit() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let resolver = AudienceResolver::new(&ctx);
    let tenant = TenantId::new();

    let at_limit = resolver
        .estimate(tenant, request(estimate_body("EMAIL", manual_audience(&emails(MAX_AUDIENCE_SIZE)))))
        .await
        .unwrap();
    assert_eq!(at_limit.count, MAX_AUDIENCE_SIZE);
    assert_eq!(at_limit.sample.len(), ESTIMATE_SAMPLE_SIZE);

    let err = resolver
        .estimate(tenant, request(estimate_body("EMAIL", manual_audience(&emails(MAX_AUDIENCE_SIZE + 1)))))
        .await
        .unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::TooManyDestinations { .. })));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_empty_estimate_is_allowed() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);

    let estimate = AudienceResolver::new(&ctx)
        .estimate(TenantId::new(), request(estimate_body("SMS", manual_audience(&[]))))
        .await
        .unwrap();

    assert_eq!(estimate.count, 0);
    assert!(estimate.sample.is_empty());
}

#[tokio::test]
async fn test_filter_audience_by_type_and_tags() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    store
        .add_customer(tenant, Some("VIP"), json!({ "email": "vip1@x.com" }), &["gold"])
        .await;
    store
        .add_customer(tenant, Some("VIP"), json!({ "email": "vip2@x.com" }), &["silver"])
        .await;
    store
        .add_customer(tenant, Some("VIP"), json!({ "phone": "+6600" }), &["gold"])
        .await;
    store
        .add_customer(tenant, Some("REGULAR"), json!({ "email": "reg@x.com" }), &["gold"])
        .await;
    store
        .add_customer(TenantId::new(), Some("VIP"), json!({ "email": "other@x.com" }), &["gold"])
        .await;

    let resolver = AudienceResolver::new(&ctx);

    let vips = resolver
        .estimate(tenant, request(estimate_body("EMAIL", filter_audience(Some("VIP"), &[]))))
        .await
        .unwrap();
    assert_eq!(vips.count, 2);

    let gold = resolver
        .estimate(tenant, request(estimate_body("EMAIL", filter_audience(None, &["gold"]))))
        .await
        .unwrap();
    assert_eq!(gold.count, 2);
    assert!(gold.sample.contains(&"vip1@x.com".to_string()));
    assert!(gold.sample.contains(&"reg@x.com".to_string()));

    let gold_vips = resolver
        .estimate(tenant, request(estimate_body("EMAIL", filter_audience(Some("VIP"), &["gold", "bronze"]))))
        .await
        .unwrap();
    assert_eq!(gold_vips.sample, vec!["vip1@x.com"]);

    // SMS addresses the phone identifier
    let sms = resolver
        .estimate(tenant, request(estimate_body("SMS", filter_audience(Some("VIP"), &["gold"]))))
        .await
        .unwrap();
    assert_eq!(sms.sample, vec!["+6600"]);
}

#[tokio::test]
async fn test_unknown_audience_mode() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);

    let err = AudienceResolver::new(&ctx)
        .estimate(TenantId::new(), request(estimate_body("EMAIL", json!({ "mode": "SEGMENT" }))))
        .await
        .unwrap_err();

    assert!(err.is_domain(|e| matches!(e, DomainError::InvalidAudienceMode(_))));
}

// ============================================================================
// Send
// ============================================================================

#[tokio::test]
async fn test_send_creates_one_delivery_per_destination() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let queued = send(&ctx, tenant, raw_broadcast("EMAIL", &emails(3), json!({ "subject": "Hi" }))).await;
    assert_eq!(queued.queued, 3);
    assert_eq!(queued.status, "QUEUED");

    let id = broadcast_id(&queued);
    let deliveries = store.deliveries_of(tenant, id).await;
    assert_eq!(deliveries.len(), 3);
    assert!(deliveries.iter().all(|d| d.status == DeliveryStatus::Queued));

    let service = BroadcastService::new(&ctx);
    let stats = service.delivery_stats(tenant, id).await.unwrap();
    assert_eq!((stats.total, stats.queued, stats.sent, stats.failed), (3, 3, 0, 0));
    assert!(!stats.complete);

    let broadcast = service.get_broadcast(tenant, id).await.unwrap();
    assert_eq!(broadcast.template_kind, "RAW");
    assert_eq!(broadcast.payload, json!({ "subject": "Hi" }));
    assert_eq!(broadcast.stats.total, 3);
}

#[tokio::test]
async fn test_explicit_destinations_take_priority() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let mut body = raw_broadcast("EMAIL", &emails(2), json!({ "subject": "Hi" }));
    body["audience"] = manual_audience(&emails(5));

    let queued = send(&ctx, tenant, body).await;
    assert_eq!(queued.queued, 2);
}

#[tokio::test]
async fn test_send_at_audience_limit() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let limit = i64::try_from(MAX_AUDIENCE_SIZE).unwrap();

    let queued = send(
        &ctx,
        tenant,
        raw_broadcast("EMAIL", &emails(MAX_AUDIENCE_SIZE), json!({ "subject": "Big" })),
    )
    .await;
    assert_eq!(queued.queued, limit);

    let id = broadcast_id(&queued);
    assert_eq!(store.deliveries_of(tenant, id).await.len(), MAX_AUDIENCE_SIZE);
    let stats = BroadcastService::new(&ctx).delivery_stats(tenant, id).await.unwrap();
    assert_eq!(stats.total, limit);
    assert_eq!(stats.queued, limit);

    let err = BroadcastService::new(&ctx)
        .send(
            tenant,
            request(raw_broadcast("EMAIL", &emails(MAX_AUDIENCE_SIZE + 1), json!({ "subject": "Big" }))),
        )
        .await
        .unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::TooManyDestinations { .. })));
    assert_eq!(err.status_code(), 400);
    assert_eq!(store.broadcast_count(tenant).await, 1);
}

#[tokio::test]
async fn test_send_to_filter_audience() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    store
        .add_customer(tenant, None, json!({ "lineUserId": "U1" }), &["promo"])
        .await;
    store
        .add_customer(tenant, None, json!({ "lineUserId": "U2" }), &["promo"])
        .await;
    store
        .add_customer(tenant, None, json!({ "email": "no-line@x.com" }), &["promo"])
        .await;

    let body = json!({
        "channel": "LINE",
        "templateKind": "RAW",
        "payload": { "type": "text", "text": "Sale" },
        "audience": filter_audience(None, &["promo"]),
    });
    let queued = send(&ctx, tenant, body).await;
    assert_eq!(queued.queued, 2);

    let mut destinations: Vec<String> = store
        .deliveries_of(tenant, broadcast_id(&queued))
        .await
        .into_iter()
        .map(|d| d.destination)
        .collect();
    destinations.sort();
    assert_eq!(destinations, vec!["U1", "U2"]);
}

#[tokio::test]
async fn test_send_with_content_template_copies_payload() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let content_id = store
        .add_content(tenant, ContentKind::Email, json!({ "subject": "Newsletter" }))
        .await;
    let body = json!({
        "channel": "EMAIL",
        "templateKind": "EMAIL_CONTENT",
        "templateId": content_id.to_string(),
        "destinations": emails(1),
    });
    let queued = send(&ctx, tenant, body).await;

    store
        .put_content(tenant, ContentKind::Email, content_id, json!({ "subject": "Edited" }))
        .await;

    let broadcast = BroadcastService::new(&ctx)
        .get_broadcast(tenant, broadcast_id(&queued))
        .await
        .unwrap();
    assert_eq!(broadcast.template_id, Some(content_id.to_string()));
    assert_eq!(broadcast.payload, json!({ "subject": "Newsletter" }));
}

#[tokio::test]
async fn test_send_rejects_zero_destinations() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let err = BroadcastService::new(&ctx)
        .send(tenant, request(raw_broadcast("EMAIL", &[], json!({ "subject": "Hi" }))))
        .await
        .unwrap_err();

    assert!(err.is_domain(|e| matches!(e, DomainError::NoDestinations)));
    assert_eq!(store.broadcast_count(tenant).await, 0);
}

#[tokio::test]
async fn test_raw_send_requires_payload() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let body = json!({
        "channel": "EMAIL",
        "templateKind": "RAW",
        "destinations": emails(1),
    });
    let err = BroadcastService::new(&ctx)
        .send(tenant, request(body))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(store.broadcast_count(tenant).await, 0);
}

#[tokio::test]
async fn test_channel_account_must_match_and_be_enabled() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let accounts = ChannelAccountService::new(&ctx);

    let line = accounts
        .create_account(tenant, request(account("LINE", "Line OA")))
        .await
        .unwrap();
    let mut body = raw_broadcast("EMAIL", &emails(1), json!({ "subject": "Hi" }));
    body["channelAccountId"] = json!(line.id);
    let err = BroadcastService::new(&ctx)
        .send(tenant, request(body))
        .await
        .unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::ChannelAccountMismatch)));
    assert_eq!(err.status_code(), 400);

    let mut mail = account("EMAIL", "Mailer");
    mail["enabled"] = json!(false);
    let mail = accounts.create_account(tenant, request(mail)).await.unwrap();
    let mut body = raw_broadcast("EMAIL", &emails(1), json!({ "subject": "Hi" }));
    body["channelAccountId"] = json!(mail.id);
    let err = BroadcastService::new(&ctx)
        .send(tenant, request(body.clone()))
        .await
        .unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::ChannelAccountDisabled)));

    // Enabling the account makes it usable
    accounts
        .set_enabled(tenant, mail.id.parse().unwrap(), true)
        .await
        .unwrap();
    let queued = send(&ctx, tenant, body).await;
    let broadcast = BroadcastService::new(&ctx)
        .get_broadcast(tenant, broadcast_id(&queued))
        .await
        .unwrap();
    assert_eq!(broadcast.channel_account_id, Some(mail.id));
    assert_eq!(store.broadcast_count(tenant).await, 1);
}

#[tokio::test]
async fn test_list_broadcasts_and_deliveries() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = BroadcastService::new(&ctx);

    send(&ctx, tenant, raw_broadcast("EMAIL", &emails(1), json!({ "n": 1 }))).await;
    let second = send(&ctx, tenant, raw_broadcast("EMAIL", &emails(4), json!({ "n": 2 }))).await;

    let broadcasts = service
        .list_broadcasts(tenant, engage_core::Page::default())
        .await
        .unwrap();
    assert_eq!(broadcasts.len(), 2);
    assert!(service
        .list_broadcasts(TenantId::new(), engage_core::Page::default())
        .await
        .unwrap()
        .is_empty());

    let id = broadcast_id(&second);
    let page = service
        .list_deliveries(tenant, id, None, engage_core::Page::new(Some(2), Some(0)))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);

    let err = service
        .list_deliveries(tenant, id, Some("BOUNCED"), engage_core::Page::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

// ============================================================================
// Delivery outcomes
// ============================================================================

#[tokio::test]
async fn test_outcomes_update_stats() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = BroadcastService::new(&ctx);

    let queued = send(&ctx, tenant, raw_broadcast("SMS", &["+661".into(), "+662".into()], json!({ "text": "x" }))).await;
    let id = broadcast_id(&queued);
    let deliveries = store.deliveries_of(tenant, id).await;

    let sent = service
        .report_outcome(tenant, deliveries[0].id, request(json!({ "status": "SENT" })))
        .await
        .unwrap();
    assert_eq!(sent.status, "SENT");

    let stats = service.delivery_stats(tenant, id).await.unwrap();
    assert_eq!((stats.total, stats.queued, stats.sent, stats.failed), (2, 1, 1, 0));
    assert!(!stats.complete);

    let failed = service
        .report_outcome(
            tenant,
            deliveries[1].id,
            request(json!({ "status": "FAILED", "errorMessage": "unreachable" })),
        )
        .await
        .unwrap();
    assert_eq!(failed.status, "FAILED");
    assert_eq!(failed.error_message.as_deref(), Some("unreachable"));

    let stats = service.delivery_stats(tenant, id).await.unwrap();
    assert_eq!((stats.total, stats.queued, stats.sent, stats.failed), (2, 0, 1, 1));
    assert!(stats.complete);

    // The stored broadcast carries the refreshed counters
    let broadcast = service.get_broadcast(tenant, id).await.unwrap();
    assert_eq!(broadcast.stats.sent, 1);
    assert_eq!(broadcast.stats.failed, 1);

    let failed_only = service
        .list_deliveries(tenant, id, Some("FAILED"), engage_core::Page::default())
        .await
        .unwrap();
    assert_eq!(failed_only.len(), 1);
    assert_eq!(failed_only[0].destination, "+662");
}

#[tokio::test]
async fn test_second_outcome_is_rejected() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = BroadcastService::new(&ctx);

    let queued = send(&ctx, tenant, raw_broadcast("EMAIL", &emails(1), json!({ "subject": "x" }))).await;
    let delivery = store.deliveries_of(tenant, broadcast_id(&queued)).await[0].clone();

    service
        .report_outcome(tenant, delivery.id, request(json!({ "status": "SENT" })))
        .await
        .unwrap();

    let err = service
        .report_outcome(tenant, delivery.id, request(json!({ "status": "FAILED" })))
        .await
        .unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::InvalidDeliveryTransition { .. })));
    assert_eq!(err.status_code(), 409);

    let stored = store.deliveries_of(tenant, delivery.broadcast_id).await;
    assert_eq!(stored[0].status, DeliveryStatus::Sent);
}

#[tokio::test]
async fn test_outcome_for_unknown_delivery() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);

    let err = BroadcastService::new(&ctx)
        .report_outcome(TenantId::new(), DeliveryId::new(), request(json!({ "status": "SENT" })))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_queued_is_not_a_reportable_outcome() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = BroadcastService::new(&ctx);

    let queued = send(&ctx, tenant, raw_broadcast("EMAIL", &emails(1), json!({ "subject": "x" }))).await;
    let delivery = store.deliveries_of(tenant, broadcast_id(&queued)).await[0].clone();

    let err = service
        .report_outcome(tenant, delivery.id, request(json!({ "status": "QUEUED" })))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}
