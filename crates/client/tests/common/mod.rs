//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use helix_client::{ApiGateway, Config, RequestService, TokenProvider};
use serde_json::{json, Value};
use tokio::sync::RwLock;

/// Token provider that counts sign-outs so tests can assert the session
/// side effect fires exactly once.
pub struct CountingTokenProvider {
    token: RwLock<Option<String>>,
    sign_outs: AtomicUsize,
}

impl CountingTokenProvider {
    pub fn new(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
            sign_outs: AtomicUsize::new(0),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            token: RwLock::new(None),
            sign_outs: AtomicUsize::new(0),
        }
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub async fn has_identity(&self) -> bool {
        self.token.read().await.is_some()
    }
}

#[async_trait]
impl TokenProvider for CountingTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn sign_out(&self) {
        self.token.write().await.take();
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }
}

/// Config pointed at a mock server.
pub fn config_at(url: &str) -> Config {
    Config {
        api_base_url: url.to_string(),
        request_timeout_secs: 5,
        poll_interval_secs: 30,
    }
}

/// Gateway wired to a mock server with the given provider.
pub fn gateway_at(url: &str, tokens: Arc<CountingTokenProvider>) -> ApiGateway {
    ApiGateway::new(&config_at(url), tokens).expect("gateway should build")
}

/// Service wired to a mock server with the given provider.
pub fn service_at(url: &str, tokens: Arc<CountingTokenProvider>) -> RequestService {
    RequestService::new(gateway_at(url, tokens))
}

/// JSON body for a request record the way the server serializes it.
pub fn request_json(id: i64, status: &str, priority: &str, updated_at: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Request {id}"),
        "description": "Need a thing built",
        "status": status,
        "status_display": status,
        "priority": priority,
        "priority_display": priority,
        "user_email": "user@example.com",
        "assigned_to": null,
        "assigned_to_email": null,
        "is_terminal": false,
        "created_at": "2026-08-01T09:00:00Z",
        "updated_at": updated_at,
    })
}

/// JSON body for an activity log entry.
pub fn activity_json(id: i64, action: &str, detail: &str) -> Value {
    json!({
        "id": id,
        "action": action,
        "action_display": action,
        "detail": detail,
        "performed_by_email": "admin@example.com",
        "timestamp": "2026-08-02T10:00:00Z",
    })
}

/// DRF-style pagination envelope around list results.
pub fn page(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}

/// Envelope the mutation endpoints wrap their record in.
pub fn mutation_envelope(request: Value) -> Value {
    json!({ "success": true, "message": "ok", "request": request })
}
