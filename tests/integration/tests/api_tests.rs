//! API Integration Tests
//!
//! Every test here spawns the full router over an in-memory store. The
//! PostgreSQL-backed tests at the bottom additionally require DATABASE_URL.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use engage_core::entities::ContentKind;
use engage_core::value_objects::{DeliveryId, TenantId};
use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn error_code(response: reqwest::Response, expected_status: StatusCode) -> String {
    let body: Value = assert_json(response, expected_status).await.unwrap();
    body["error"]["code"].as_str().unwrap_or_default().to_string()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_unscoped("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get_unscoped("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");

    server.store().set_healthy(false);
    let response = server.get_unscoped("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await.unwrap();
    let response = server.get_unscoped("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Tenant Tests
// ============================================================================

#[tokio::test]
async fn test_missing_tenant_header() {
    let server = TestServer::start().await.unwrap();

    let response = server.get_unscoped("/api/v1/rules").await.unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "MISSING_TENANT");
}

#[tokio::test]
async fn test_invalid_tenant_header() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .client
        .get(format!("{}/api/v1/rules", server.base_url()))
        .header(integration_tests::TENANT_HEADER, "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "INVALID_TENANT");
}

// ============================================================================
// Rule Tests
// ============================================================================

#[tokio::test]
async fn test_rule_crud() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();
    let name = unique_name("Greeting");

    let response = server
        .post("/api/v1/rules", tenant, &raw_rule("LINE", &name, &["hello"], json!({ "text": "Hi!" })))
        .await
        .unwrap();
    let rule: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let id = rule["id"].as_str().unwrap().to_string();
    assert_eq!(rule["name"], name.as_str());
    assert_eq!(rule["responseKind"], "RAW");

    let response = server.get(&format!("/api/v1/rules/{id}"), tenant).await.unwrap();
    let fetched: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched["id"], id.as_str());

    let response = server
        .patch(&format!("/api/v1/rules/{id}"), tenant, &json!({ "status": "INACTIVE" }))
        .await
        .unwrap();
    let updated: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated["status"], "INACTIVE");

    let response = server.get("/api/v1/rules?channel=LINE", tenant).await.unwrap();
    let listed: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);

    let response = server.delete(&format!("/api/v1/rules/{id}"), tenant).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/api/v1/rules/{id}"), tenant).await.unwrap();
    assert_eq!(error_code(response, StatusCode::NOT_FOUND).await, "UNKNOWN_RULE");
}

#[tokio::test]
async fn test_rule_is_scoped_to_tenant() {
    let server = TestServer::start().await.unwrap();
    let owner = TenantId::new();

    let response = server
        .post("/api/v1/rules", owner, &raw_rule("LINE", "Mine", &["x"], json!({ "text": "x" })))
        .await
        .unwrap();
    let rule: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let id = rule["id"].as_str().unwrap();

    let response = server
        .get(&format!("/api/v1/rules/{id}"), TenantId::new())
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_rule_name_rejected() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();
    let body = raw_rule("MESSENGER", "Twice", &["x"], json!({ "text": "x" }));

    let response = server.post("/api/v1/rules", tenant, &body).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/api/v1/rules", tenant, &body).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_rule_body_errors() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();

    // Not JSON
    let response = server
        .client
        .post(format!("{}/api/v1/rules", server.base_url()))
        .header(integration_tests::TENANT_HEADER, tenant.to_string())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "INVALID_BODY");

    // Fails field validation
    let response = server
        .post("/api/v1/rules", tenant, &raw_rule("LINE", "", &["x"], json!({ "text": "x" })))
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "VALIDATION_ERROR");

    // Malformed id in the path
    let response = server.get("/api/v1/rules/not-an-id", tenant).await.unwrap();
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await,
        "INVALID_PATH_PARAMETER"
    );
}

#[tokio::test]
async fn test_preview_rules() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();

    server
        .post("/api/v1/rules", tenant, &raw_rule("LINE", "Price", &["ราคา"], json!({ "text": "x" })))
        .await
        .unwrap();

    let response = server
        .post("/api/v1/rules/preview", tenant, &json!({ "channel": "LINE", "text": "ราคาเท่าไหร่" }))
        .await
        .unwrap();
    let preview: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(preview["matched"], true);
    assert_eq!(preview["ruleName"], "Price");
    assert_eq!(preview["matchedKeywords"], json!(["ราคา"]));

    assert!(server.store().inbound_logs(tenant).await.is_empty());
}

// ============================================================================
// Inbound Tests
// ============================================================================

#[tokio::test]
async fn test_inbound_webhook() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();

    let response = server
        .post(
            "/api/v1/rules",
            tenant,
            &raw_rule("LINE", "Price", &["ราคา"], json!({ "text": "See our price list" })),
        )
        .await
        .unwrap();
    let rule: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post("/api/v1/inbound/LINE", tenant, &inbound("ขอถามราคาหน่อยครับ", Some("U123")))
        .await
        .unwrap();
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result["matched"], true);
    assert_eq!(result["matchedRuleId"], rule["id"]);
    assert!(result["outboxEntryId"].is_string());

    let outbox = server.store().outbox_entries(tenant).await;
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].payload, json!({ "text": "See our price list" }));
}

#[tokio::test]
async fn test_inbound_partial_tag_failure_is_ok() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();
    let store = server.store();

    store
        .add_customer(tenant, None, json!({ "psid": "P1" }), &[])
        .await;
    store.fail_tag("broken").await;
    server
        .post("/api/v1/rules", tenant, &label_rule("MESSENGER", "Tags", &["hi"], &["broken", "fine"]))
        .await
        .unwrap();

    let response = server
        .post("/api/v1/inbound/MESSENGER", tenant, &inbound("hi", Some("P1")))
        .await
        .unwrap();
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result["matched"], false);
    assert_eq!(result["labelMatchedCount"], 1);
    assert_eq!(result["assignedTagIds"], json!(["fine"]));
    assert_eq!(result["tagFailures"][0]["tagId"], "broken");
}

#[tokio::test]
async fn test_inbound_on_unsupported_channel() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/v1/inbound/SMS", TenantId::new(), &inbound("hi", Some("+661")))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Channel Account Tests
// ============================================================================

#[tokio::test]
async fn test_channel_accounts() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();

    let response = server
        .post("/api/v1/channel-accounts", tenant, &account("EMAIL", "Mailer"))
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created["credentials"].is_object());

    let response = server.get("/api/v1/channel-accounts", tenant).await.unwrap();
    let listed: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].get("credentials").is_none());

    let response = server
        .put(
            &format!("/api/v1/channel-accounts/{id}/enabled"),
            tenant,
            &json!({ "enabled": false }),
        )
        .await
        .unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(toggled["enabled"], false);

    let response = server
        .delete(&format!("/api/v1/channel-accounts/{id}"), tenant)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

// ============================================================================
// Broadcast Tests
// ============================================================================

#[tokio::test]
async fn test_broadcast_send_and_outcomes() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();

    let response = server
        .post(
            "/api/v1/broadcasts",
            tenant,
            &raw_broadcast("EMAIL", &emails(2), json!({ "subject": "News" })),
        )
        .await
        .unwrap();
    let queued: Value = assert_json(response, StatusCode::ACCEPTED).await.unwrap();
    assert_eq!(queued["queued"], 2);
    assert_eq!(queued["status"], "QUEUED");
    let broadcast_id = queued["broadcastId"].as_str().unwrap().to_string();

    let response = server
        .get(&format!("/api/v1/broadcasts/{broadcast_id}/deliveries"), tenant)
        .await
        .unwrap();
    let deliveries: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(deliveries.len(), 2);
    let delivery_id = deliveries[0]["id"].as_str().unwrap().to_string();

    let outcome_path = format!("/api/v1/deliveries/{delivery_id}/outcome");
    let response = server
        .post(&outcome_path, tenant, &json!({ "status": "SENT" }))
        .await
        .unwrap();
    let delivery: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(delivery["status"], "SENT");

    let response = server
        .post(&outcome_path, tenant, &json!({ "status": "FAILED" }))
        .await
        .unwrap();
    assert_eq!(
        error_code(response, StatusCode::CONFLICT).await,
        "INVALID_DELIVERY_TRANSITION"
    );

    let response = server
        .get(&format!("/api/v1/broadcasts/{broadcast_id}/stats"), tenant)
        .await
        .unwrap();
    let stats: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(
        stats,
        json!({ "total": 2, "queued": 1, "sent": 1, "failed": 0, "complete": false })
    );

    let response = server
        .get(
            &format!("/api/v1/broadcasts/{broadcast_id}/deliveries?status=QUEUED"),
            tenant,
        )
        .await
        .unwrap();
    let queued_only: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(queued_only.len(), 1);

    let response = server.get("/api/v1/broadcasts?limit=10", tenant).await.unwrap();
    let broadcasts: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(broadcasts.len(), 1);
    assert_eq!(broadcasts[0]["stats"]["sent"], 1);
}

#[tokio::test]
async fn test_broadcast_with_content_template() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();
    let content_id = server
        .store()
        .add_content(tenant, ContentKind::Sms, json!({ "text": "Your code" }))
        .await;

    let body = json!({
        "channel": "SMS",
        "templateKind": "SMS_CONTENT",
        "templateId": content_id.to_string(),
        "destinations": ["+661"],
    });
    let response = server.post("/api/v1/broadcasts", tenant, &body).await.unwrap();
    let queued: Value = assert_json(response, StatusCode::ACCEPTED).await.unwrap();

    let response = server
        .get(
            &format!("/api/v1/broadcasts/{}", queued["broadcastId"].as_str().unwrap()),
            tenant,
        )
        .await
        .unwrap();
    let broadcast: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(broadcast["payload"], json!({ "text": "Your code" }));
    assert_eq!(broadcast["templateKind"], "SMS_CONTENT");
}

#[tokio::test]
async fn test_broadcast_without_destinations() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            "/api/v1/broadcasts",
            TenantId::new(),
            &raw_broadcast("EMAIL", &[], json!({ "subject": "x" })),
        )
        .await
        .unwrap();
    assert_eq!(error_code(response, StatusCode::BAD_REQUEST).await, "NO_DESTINATIONS");
}

#[tokio::test]
async fn test_estimate_audience() {
    let server = TestServer::start().await.unwrap();

    let body = json!({
        "channel": "EMAIL",
        "audience": manual_audience(&["a@x.com".into(), "A@x.com".into(), "b@x.com".into()]),
    });
    let response = server
        .post("/api/v1/broadcasts/estimate", TenantId::new(), &body)
        .await
        .unwrap();
    let estimate: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(estimate["count"], 2);
}

#[tokio::test]
async fn test_outcome_for_unknown_delivery() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            &format!("/api/v1/deliveries/{}/outcome", DeliveryId::new()),
            TenantId::new(),
            &json!({ "status": "SENT" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Immediate Message Tests
// ============================================================================

#[tokio::test]
async fn test_immediate_send() {
    let server = TestServer::start().await.unwrap();
    let tenant = TenantId::new();

    let response = server
        .post(
            "/api/v1/immediates",
            tenant,
            &raw_immediate("SMS", "OTP blast", manual_audience(&["+661".into()]), json!({ "text": "hi" })),
        )
        .await
        .unwrap();
    let draft: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(draft["status"], "DRAFT");
    let id = draft["id"].as_str().unwrap().to_string();

    let send_path = format!("/api/v1/immediates/{id}/send");
    for _ in 0..2 {
        let response = server.post(&send_path, tenant, &json!({})).await.unwrap();
        let sent: Value = assert_json(response, StatusCode::ACCEPTED).await.unwrap();
        assert_eq!(sent["immediate"]["status"], "SENT");
        assert_eq!(sent["broadcast"]["queued"], 1);
    }
    assert_eq!(server.store().broadcast_count(tenant).await, 2);

    let response = server.get("/api/v1/immediates", tenant).await.unwrap();
    let listed: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0]["lastBroadcastId"].is_string());
}

// ============================================================================
// PostgreSQL-backed Tests
// ============================================================================

#[tokio::test]
async fn test_postgres_readiness() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start_postgres()
        .await
        .expect("Failed to start server");
    let response = server.get_unscoped("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_postgres_rule_and_inbound_flow() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start_postgres()
        .await
        .expect("Failed to start server");
    let tenant = TenantId::new();

    let response = server
        .post(
            "/api/v1/rules",
            tenant,
            &raw_rule("LINE", &unique_name("Price"), &["ราคา"], json!({ "text": "See our price list" })),
        )
        .await
        .unwrap();
    let rule: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post("/api/v1/inbound/LINE", tenant, &inbound("ขอถามราคาหน่อยครับ", Some("U123")))
        .await
        .unwrap();
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result["matchedRuleId"], rule["id"]);
    assert!(result["outboxEntryId"].is_string());
}

#[tokio::test]
async fn test_postgres_broadcast_flow() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start_postgres()
        .await
        .expect("Failed to start server");
    let tenant = TenantId::new();

    let response = server
        .post(
            "/api/v1/broadcasts",
            tenant,
            &raw_broadcast("EMAIL", &emails(3), json!({ "subject": "News" })),
        )
        .await
        .unwrap();
    let queued: Value = assert_json(response, StatusCode::ACCEPTED).await.unwrap();
    let broadcast_id = queued["broadcastId"].as_str().unwrap().to_string();

    let response = server
        .get(&format!("/api/v1/broadcasts/{broadcast_id}/deliveries"), tenant)
        .await
        .unwrap();
    let deliveries: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(deliveries.len(), 3);

    let outcome_path = format!(
        "/api/v1/deliveries/{}/outcome",
        deliveries[0]["id"].as_str().unwrap()
    );
    let response = server
        .post(&outcome_path, tenant, &json!({ "status": "FAILED", "errorMessage": "bounced" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post(&outcome_path, tenant, &json!({ "status": "SENT" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .get(&format!("/api/v1/broadcasts/{broadcast_id}/stats"), tenant)
        .await
        .unwrap();
    let stats: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["failed"], 1);
}
