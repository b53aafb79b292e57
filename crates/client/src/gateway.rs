//! Authenticated HTTP gateway for the Helix API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::config::Config;
use crate::error::ApiError;

/// Body substrings that mark a 401 as a stale session rather than a
/// misconfigured auth backend.
const SESSION_MARKERS: [&str; 2] = ["auth", "token"];

/// Turns a logical operation (verb, path, body) into a classified result.
///
/// Every request/response cycle goes through [`ApiGateway::call`]: the
/// credential is fetched fresh from the [`TokenProvider`], attached as a
/// bearer header, and the response is classified into the [`ApiError`]
/// taxonomy. Transport-level faults never propagate unclassified.
#[derive(Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiGateway {
    /// Build a gateway for the configured base URL.
    pub fn new(config: &Config, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Issue `method` against `path` (relative to the base URL) and classify
    /// the outcome.
    ///
    /// Order matters here: the 401 session-vs-backend split runs before
    /// generic failure handling, and the pagination unwrap runs only after
    /// the response is known to be a success.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let Some(token) = self.tokens.bearer_token().await else {
            return Err(ApiError::Unauthenticated);
        };

        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "issuing API call");

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // A stale session forces a sign-out; any other 401 leaves the
            // identity alone so a backend hiccup does not log the user out.
            let text = response.text().await.unwrap_or_default();
            if SESSION_MARKERS.iter().any(|marker| text.contains(marker)) {
                warn!(%url, "session rejected by server, signing out");
                self.tokens.sign_out().await;
                return Err(ApiError::SessionExpired);
            }
            return Err(ApiError::AuthBackend);
        }

        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::Forbidden);
        }

        if !status.is_success() {
            return Err(ApiError::RequestFailed(failure_message(status, response).await));
        }

        let text = response.text().await?;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(unwrap_page(value))
    }
}

/// Best-effort extraction of a structured error message, falling back to the
/// HTTP status text when the body has no parseable message.
async fn failure_message(status: StatusCode, response: reqwest::Response) -> String {
    let body: Option<Value> = response.json().await.ok();
    body.as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("detail")))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| {
            format!(
                "API error: {}",
                status.canonical_reason().unwrap_or_else(|| status.as_str())
            )
        })
}

/// List endpoints paginate as `{count, next, previous, results}`; callers
/// only ever want the `results` sequence. Anything else passes through.
fn unwrap_page(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if map.contains_key("count")
                && map.contains_key("next")
                && map.contains_key("previous")
                && map.get("results").is_some_and(Value::is_array) =>
        {
            map.remove("results").unwrap_or(Value::Null)
        }
        other => other,
    }
}
