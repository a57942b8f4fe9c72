//! Inbound dispatcher tests
//!
//! Run against the in-memory store:
//! cargo test -p integration-tests --test dispatcher_tests

use std::time::Duration;

use engage_core::entities::OutboxStatus;
use engage_core::value_objects::{Channel, TenantId};
use engage_service::{InboundDispatcher, RuleResponse, RuleService};
use integration_tests::{fixtures::*, MemoryStore};
use serde_json::json;

async fn create_rule(ctx: &engage_service::ServiceContext, tenant: TenantId, body: serde_json::Value) -> RuleResponse {
    RuleService::new(ctx)
        .create_rule(tenant, request(body))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_thai_keyword_queues_reply() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let rule = create_rule(
        &ctx,
        tenant,
        raw_rule("LINE", "Price", &["ราคา"], json!({ "text": "See our price list" })),
    )
    .await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("ขอถามราคาหน่อยครับ", Some("U123"))))
        .await
        .unwrap();

    assert!(outcome.is_matched());
    assert_eq!(outcome.matched_rule_id.map(|id| id.to_string()), Some(rule.id.clone()));
    assert_eq!(outcome.matched_keywords, vec!["ราคา"]);
    assert!(outcome.tag_failures.is_empty());

    let logs = store.inbound_logs(tenant).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, outcome.log_id);
    assert_eq!(logs[0].text, "ขอถามราคาหน่อยครับ");
    assert_eq!(logs[0].destination.as_deref(), Some("U123"));

    let outbox = store.outbox_entries(tenant).await;
    assert_eq!(outbox.len(), 1);
    assert_eq!(Some(outbox[0].id), outcome.outbox_entry_id);
    assert_eq!(outbox[0].status, OutboxStatus::Pending);
    assert_eq!(outbox[0].destination, "U123");
    assert_eq!(outbox[0].channel, Channel::Line);
    assert_eq!(outbox[0].payload, json!({ "text": "See our price list" }));
}

#[tokio::test]
async fn test_no_match_is_success() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    create_rule(&ctx, tenant, raw_rule("LINE", "Price", &["ราคา"], json!({ "text": "x" }))).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("hello there", Some("U123"))))
        .await
        .unwrap();

    assert!(!outcome.is_matched());
    assert!(outcome.matched_keywords.is_empty());
    assert!(outcome.outbox_entry_id.is_none());

    // The evaluation is still logged
    let logs = store.inbound_logs(tenant).await;
    assert_eq!(logs.len(), 1);
    assert!(logs[0].matched_rule_id.is_none());
    assert!(store.outbox_entries(tenant).await.is_empty());
}

#[tokio::test]
async fn test_rules_of_other_channels_and_tenants_are_ignored() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let other = TenantId::new();

    create_rule(&ctx, tenant, raw_rule("MESSENGER", "Price", &["price"], json!({ "text": "x" }))).await;
    create_rule(&ctx, other, raw_rule("LINE", "Price", &["price"], json!({ "text": "x" }))).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("price?", Some("U1"))))
        .await
        .unwrap();

    assert!(!outcome.is_matched());
    assert!(store.outbox_entries(other).await.is_empty());
}

#[tokio::test]
async fn test_without_destination_nothing_is_queued() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    create_rule(&ctx, tenant, raw_rule("LINE", "Price", &["price"], json!({ "text": "x" }))).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("price", None)))
        .await
        .unwrap();

    assert!(outcome.is_matched());
    assert!(outcome.outbox_entry_id.is_none());
    assert!(store.outbox_entries(tenant).await.is_empty());
}

#[tokio::test]
async fn test_newest_rule_wins() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    create_rule(&ctx, tenant, raw_rule("LINE", "Old", &["promo"], json!({ "text": "old" }))).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newest = create_rule(&ctx, tenant, raw_rule("LINE", "New", &["promo"], json!({ "text": "new" }))).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("any promo today?", Some("U1"))))
        .await
        .unwrap();

    assert_eq!(outcome.matched_rule_id.map(|id| id.to_string()), Some(newest.id));
    let outbox = store.outbox_entries(tenant).await;
    assert_eq!(outbox[0].payload, json!({ "text": "new" }));
}

#[tokio::test]
async fn test_inactive_rule_never_matches() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let mut body = raw_rule("LINE", "Paused", &["promo"], json!({ "text": "x" }));
    body["status"] = json!("INACTIVE");
    create_rule(&ctx, tenant, body).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("promo", Some("U1"))))
        .await
        .unwrap();

    assert!(!outcome.is_matched());
}

#[tokio::test]
async fn test_equals_rule_needs_whole_text() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let mut body = raw_rule("LINE", "Exact", &["Hi"], json!({ "text": "hello" }));
    body["matchType"] = json!("EQUALS");
    create_rule(&ctx, tenant, body).await;

    let dispatcher = InboundDispatcher::new(&ctx);
    let partial = dispatcher
        .handle_inbound(tenant, Channel::Line, request(inbound("hi there", Some("U1"))))
        .await
        .unwrap();
    assert!(!partial.is_matched());

    let exact = dispatcher
        .handle_inbound(tenant, Channel::Line, request(inbound("  hi ", Some("U1"))))
        .await
        .unwrap();
    assert!(exact.is_matched());
}

#[tokio::test]
async fn test_label_and_response_rules_together() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let customer = store
        .add_customer(tenant, None, json!({ "lineUserId": "U42" }), &[])
        .await;

    let mut reply = raw_rule("LINE", "Price", &["price"], json!({ "text": "prices" }));
    reply["tagIds"] = json!(["interested"]);
    create_rule(&ctx, tenant, reply).await;
    create_rule(&ctx, tenant, label_rule("LINE", "Shoppers", &["buy"], &["shopper"])).await;
    create_rule(&ctx, tenant, label_rule("ALL", "Everywhere", &["price"], &["pricing", "interested"])).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("I want to buy, price?", Some("U42"))))
        .await
        .unwrap();

    assert!(outcome.is_matched());
    assert_eq!(outcome.label_matched_count, 2);
    assert!(outcome.outbox_entry_id.is_some());

    let assigned: Vec<&str> = outcome.assigned_tag_ids.iter().map(|t| t.as_str()).collect();
    assert_eq!(assigned[0], "interested");
    assert_eq!(assigned.len(), 3);
    assert!(assigned.contains(&"shopper"));
    assert!(assigned.contains(&"pricing"));

    assert_eq!(
        store.tags_of(tenant, customer).await,
        vec!["interested", "pricing", "shopper"]
    );
}

#[tokio::test]
async fn test_label_rule_alone_tags_without_reply() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let customer = store
        .add_customer(tenant, None, json!({ "psid": "P-7" }), &[])
        .await;
    create_rule(&ctx, tenant, label_rule("MESSENGER", "Vip", &["vip"], &["vip"])).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Messenger, request(inbound("am I VIP?", Some("P-7"))))
        .await
        .unwrap();

    assert!(!outcome.is_matched());
    assert_eq!(outcome.label_matched_count, 1);
    assert!(outcome.outbox_entry_id.is_none());
    assert_eq!(store.tags_of(tenant, customer).await, vec!["vip"]);
    assert!(store.outbox_entries(tenant).await.is_empty());
}

#[tokio::test]
async fn test_tag_assignment_is_idempotent() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let customer = store
        .add_customer(tenant, None, json!({ "lineUserId": "U1" }), &["vip"])
        .await;
    create_rule(&ctx, tenant, label_rule("LINE", "Vip", &["vip"], &["vip"])).await;

    let dispatcher = InboundDispatcher::new(&ctx);
    for _ in 0..2 {
        let outcome = dispatcher
            .handle_inbound(tenant, Channel::Line, request(inbound("vip", Some("U1"))))
            .await
            .unwrap();
        assert_eq!(outcome.assigned_tag_ids.len(), 1);
        assert!(outcome.tag_failures.is_empty());
    }

    assert_eq!(store.tags_of(tenant, customer).await, vec!["vip"]);
}

#[tokio::test]
async fn test_unknown_sender_skips_tags() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    create_rule(&ctx, tenant, label_rule("LINE", "Vip", &["vip"], &["vip"])).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("vip", Some("U-unknown"))))
        .await
        .unwrap();

    assert!(outcome.assigned_tag_ids.is_empty());
    assert!(outcome.tag_failures.is_empty());
}

#[tokio::test]
async fn test_tag_write_failure_is_reported_not_raised() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let customer = store
        .add_customer(tenant, None, json!({ "lineUserId": "U1" }), &[])
        .await;
    store.fail_tag("broken").await;
    create_rule(&ctx, tenant, label_rule("LINE", "Tags", &["hello"], &["broken", "ok"])).await;

    let outcome = InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("hello", Some("U1"))))
        .await
        .unwrap();

    assert_eq!(outcome.tag_failures.len(), 1);
    assert_eq!(outcome.tag_failures[0].tag_id.as_str(), "broken");
    assert!(!outcome.tag_failures[0].message.is_empty());
    assert_eq!(outcome.assigned_tag_ids.len(), 1);
    assert_eq!(store.tags_of(tenant, customer).await, vec!["ok"]);
    assert_eq!(store.inbound_logs(tenant).await.len(), 1);
}

#[tokio::test]
async fn test_first_enabled_account_is_attached() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let accounts = engage_service::ChannelAccountService::new(&ctx);
    let mut disabled = account("LINE", "Disabled");
    disabled["enabled"] = json!(false);
    accounts.create_account(tenant, request(disabled)).await.unwrap();
    let enabled = accounts
        .create_account(tenant, request(account("LINE", "Main")))
        .await
        .unwrap();

    create_rule(&ctx, tenant, raw_rule("LINE", "Price", &["price"], json!({ "text": "x" }))).await;
    InboundDispatcher::new(&ctx)
        .handle_inbound(tenant, Channel::Line, request(inbound("price", Some("U1"))))
        .await
        .unwrap();

    let outbox = store.outbox_entries(tenant).await;
    assert_eq!(
        outbox[0].channel_account_id.map(|id| id.to_string()),
        Some(enabled.id)
    );
}

#[tokio::test]
async fn test_inbound_on_email_is_rejected() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);

    let err = InboundDispatcher::new(&ctx)
        .handle_request(TenantId::new(), "EMAIL", request(inbound("hi", Some("a@x.com"))))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_preview_writes_nothing() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();

    let rule = create_rule(&ctx, tenant, raw_rule("LINE", "Price", &["ราคา"], json!({ "text": "x" }))).await;
    create_rule(&ctx, tenant, label_rule("ALL", "Pricing", &["ราคา"], &["pricing"])).await;

    let preview = InboundDispatcher::new(&ctx)
        .preview_match(tenant, request(json!({ "channel": "LINE", "text": "ราคาเท่าไหร่" })))
        .await
        .unwrap();

    assert!(preview.matched);
    assert_eq!(preview.rule_id, Some(rule.id));
    assert_eq!(preview.rule_name.as_deref(), Some("Price"));
    assert_eq!(preview.label_rule_ids.len(), 1);
    assert_eq!(preview.tag_ids, vec!["pricing"]);

    assert!(store.inbound_logs(tenant).await.is_empty());
    assert!(store.outbox_entries(tenant).await.is_empty());
}
