//! Immediate message and channel account tests
//!
//! Run with: cargo test -p integration-tests --test immediate_tests

use engage_core::value_objects::{BroadcastId, ChannelAccountId, ImmediateId, TenantId};
use engage_core::{DomainError, Page};
use engage_service::{BroadcastService, ChannelAccountService, ImmediateService};
use integration_tests::{fixtures::*, MemoryStore};
use serde_json::json;

// ============================================================================
// Immediate messages
// ============================================================================

#[tokio::test]
async fn test_send_immediate_moves_draft_to_sent() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ImmediateService::new(&ctx);

    let draft = service
        .create_immediate(
            tenant,
            request(raw_immediate(
                "EMAIL",
                "Flash sale",
                manual_audience(&emails(3)),
                json!({ "subject": "Sale" }),
            )),
        )
        .await
        .unwrap();
    assert_eq!(draft.status, "DRAFT");
    assert!(draft.last_broadcast_id.is_none());

    let id: ImmediateId = draft.id.parse().unwrap();
    let first = service.send_immediate(tenant, id).await.unwrap();
    assert_eq!(first.immediate.status, "SENT");
    assert_eq!(first.broadcast.queued, 3);
    assert_eq!(
        first.immediate.last_broadcast_id.as_deref(),
        Some(first.broadcast.broadcast_id.as_str())
    );

    let broadcast_id: BroadcastId = first.broadcast.broadcast_id.parse().unwrap();
    let broadcast = BroadcastService::new(&ctx)
        .get_broadcast(tenant, broadcast_id)
        .await
        .unwrap();
    assert_eq!(broadcast.immediate_id, Some(draft.id.clone()));
    assert_eq!(broadcast.payload, json!({ "subject": "Sale" }));

    // Sending again creates another broadcast and stays SENT
    let second = service.send_immediate(tenant, id).await.unwrap();
    assert_eq!(second.immediate.status, "SENT");
    assert_ne!(second.broadcast.broadcast_id, first.broadcast.broadcast_id);
    assert_eq!(store.broadcast_count(tenant).await, 2);

    let stored = service.get_immediate(tenant, id).await.unwrap();
    assert_eq!(stored.last_broadcast_id, Some(second.broadcast.broadcast_id));
}

#[tokio::test]
async fn test_failed_send_keeps_draft() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ImmediateService::new(&ctx);

    let draft = service
        .create_immediate(
            tenant,
            request(raw_immediate("LINE", "Nobody", filter_audience(None, &["ghost"]), json!({ "text": "hi" }))),
        )
        .await
        .unwrap();
    let id: ImmediateId = draft.id.parse().unwrap();

    let err = service.send_immediate(tenant, id).await.unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::NoDestinations)));

    let stored = service.get_immediate(tenant, id).await.unwrap();
    assert_eq!(stored.status, "DRAFT");
    assert_eq!(store.broadcast_count(tenant).await, 0);
}

#[tokio::test]
async fn test_update_immediate_keeps_status() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ImmediateService::new(&ctx);

    let draft = service
        .create_immediate(
            tenant,
            request(raw_immediate("SMS", "Reminder", manual_audience(&["+661".to_string()]), json!({ "text": "a" }))),
        )
        .await
        .unwrap();
    let id: ImmediateId = draft.id.parse().unwrap();
    service.send_immediate(tenant, id).await.unwrap();

    let updated = service
        .update_immediate(
            tenant,
            id,
            request(json!({ "name": "Reminder v2", "payload": { "text": "b" } })),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Reminder v2");
    assert_eq!(updated.payload, Some(json!({ "text": "b" })));
    assert_eq!(updated.status, "SENT");
}

#[tokio::test]
async fn test_immediate_validation() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ImmediateService::new(&ctx);

    let mut content = raw_immediate("LINE", "Menu", manual_audience(&["U1".to_string()]), json!({}));
    content["templateKind"] = json!("LINE_CONTENT");
    let err = service.create_immediate(tenant, request(content)).await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    let bad_mode = raw_immediate("LINE", "Bad", json!({ "mode": "EVERYONE" }), json!({ "text": "x" }));
    let err = service.create_immediate(tenant, request(bad_mode)).await.unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::InvalidAudienceMode(_))));
}

#[tokio::test]
async fn test_list_and_delete_immediates() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ImmediateService::new(&ctx);

    for name in ["One", "Two"] {
        service
            .create_immediate(
                tenant,
                request(raw_immediate("EMAIL", name, manual_audience(&emails(1)), json!({ "subject": name }))),
            )
            .await
            .unwrap();
    }

    let listed = service.list_immediates(tenant, Page::default()).await.unwrap();
    assert_eq!(listed.len(), 2);

    let id: ImmediateId = listed[0].id.parse().unwrap();
    service.delete_immediate(tenant, id).await.unwrap();
    assert_eq!(service.list_immediates(tenant, Page::default()).await.unwrap().len(), 1);

    let err = service.delete_immediate(tenant, id).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

// ============================================================================
// Channel accounts
// ============================================================================

#[tokio::test]
async fn test_account_credentials_only_in_detail_view() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ChannelAccountService::new(&ctx);

    let created = service
        .create_account(tenant, request(account("LINE", "Main OA")))
        .await
        .unwrap();
    assert!(created.enabled);
    assert!(created.credentials.is_some());

    let listed = service.list_accounts(tenant, Some("LINE")).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].credentials.is_none());
    assert!(service.list_accounts(tenant, Some("SMS")).await.unwrap().is_empty());

    let id: ChannelAccountId = created.id.parse().unwrap();
    let detail = service.get_account(tenant, id).await.unwrap();
    assert_eq!(detail.credentials, created.credentials);
}

#[tokio::test]
async fn test_account_name_is_unique_per_channel() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ChannelAccountService::new(&ctx);

    service
        .create_account(tenant, request(account("EMAIL", "Mailer")))
        .await
        .unwrap();
    let err = service
        .create_account(tenant, request(account("EMAIL", "Mailer")))
        .await
        .unwrap_err();
    assert!(err.is_domain(|e| matches!(e, DomainError::ChannelAccountNameExists)));
    assert_eq!(err.status_code(), 400);

    service
        .create_account(tenant, request(account("SMS", "Mailer")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_account_credentials_must_be_object() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);

    let mut body = account("SMS", "Gateway");
    body["credentials"] = json!("plain-token");
    let err = ChannelAccountService::new(&ctx)
        .create_account(TenantId::new(), request(body))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_toggle_update_and_delete_account() {
    let store = MemoryStore::new();
    let ctx = MemoryStore::context(&store);
    let tenant = TenantId::new();
    let service = ChannelAccountService::new(&ctx);

    let created = service
        .create_account(tenant, request(account("MESSENGER", "Page")))
        .await
        .unwrap();
    let id: ChannelAccountId = created.id.parse().unwrap();

    let disabled = service.set_enabled(tenant, id, false).await.unwrap();
    assert!(!disabled.enabled);

    let renamed = service
        .update_account(tenant, id, request(json!({ "name": "Page 2", "enabled": true })))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Page 2");
    assert!(renamed.enabled);

    service.delete_account(tenant, id).await.unwrap();
    let err = service.get_account(tenant, id).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}
