//! Test fixtures and data generators
//!
//! Request bodies are built as JSON so the same fixture drives both the
//! services (deserialized into DTOs) and the HTTP API.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique name with a readable prefix
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", unique_suffix())
}

/// Deserialize a fixture body into a request DTO
pub fn request<T: DeserializeOwned>(body: Value) -> T {
    match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => panic!("fixture does not match request shape: {e}"),
    }
}

/// RAW reply rule
pub fn raw_rule(channel: &str, name: &str, keywords: &[&str], payload: Value) -> Value {
    json!({
        "name": name,
        "channel": channel,
        "keywords": keywords,
        "responseKind": "RAW",
        "payload": payload,
    })
}

/// Reply rule bound to a content object
pub fn content_rule(channel: &str, name: &str, keywords: &[&str], kind: &str, template_id: &str) -> Value {
    json!({
        "name": name,
        "channel": channel,
        "keywords": keywords,
        "responseKind": kind,
        "templateId": template_id,
    })
}

/// Label-keyword rule that only tags
pub fn label_rule(channel: &str, name: &str, keywords: &[&str], tags: &[&str]) -> Value {
    json!({
        "name": name,
        "channel": channel,
        "keywords": keywords,
        "tagIds": tags,
        "metadata": { "kind": "LABEL_KEYWORDS" },
    })
}

/// Inbound chat message
pub fn inbound(text: &str, destination: Option<&str>) -> Value {
    json!({
        "text": text,
        "destination": destination,
    })
}

/// Channel account registration
pub fn account(channel: &str, name: &str) -> Value {
    json!({
        "channel": channel,
        "name": name,
        "credentials": { "token": format!("secret-{}", unique_suffix()) },
    })
}

/// RAW broadcast to an explicit destination list
pub fn raw_broadcast(channel: &str, destinations: &[String], payload: Value) -> Value {
    json!({
        "channel": channel,
        "templateKind": "RAW",
        "payload": payload,
        "destinations": destinations,
    })
}

/// Manual audience
pub fn manual_audience(destinations: &[String]) -> Value {
    json!({
        "mode": "MANUAL",
        "destinations": destinations,
    })
}

/// Filter audience
pub fn filter_audience(customer_type: Option<&str>, tags: &[&str]) -> Value {
    json!({
        "mode": "FILTER",
        "customerType": customer_type,
        "tagIds": tags,
    })
}

/// `count` distinct e-mail destinations
pub fn emails(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("user{i}@example.com")).collect()
}

/// Saved immediate message with a RAW payload
pub fn raw_immediate(channel: &str, name: &str, audience: Value, payload: Value) -> Value {
    json!({
        "name": name,
        "channel": channel,
        "templateKind": "RAW",
        "payload": payload,
        "audience": audience,
    })
}
