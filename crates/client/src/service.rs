//! Operation façade over the gateway, one method per endpoint.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::ApiGateway;
use crate::models::{Activity, ActivityScope, NewRequest, Request, RequestUpdate, UserProfile};

/// Thin mapping from domain operations to API endpoints.
///
/// Role requirements (end user vs administrator) are enforced server-side;
/// this layer only selects the endpoint and verb and unwraps response
/// envelopes. It holds no business rules.
#[derive(Clone)]
pub struct RequestService {
    gateway: ApiGateway,
}

impl RequestService {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Submit a new request. Priority defaults to `MEDIUM` when unset.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: &NewRequest) -> Result<Request, ApiError> {
        let body = serde_json::to_value(input)?;
        let value = self.gateway.call(Method::POST, "/requests/", Some(body)).await?;
        parse_request(value)
    }

    /// List the authenticated user's own requests.
    #[instrument(skip(self))]
    pub async fn list_mine(&self) -> Result<Vec<Request>, ApiError> {
        let value = self.gateway.call(Method::GET, "/requests/", None).await?;
        parse(value)
    }

    /// List every request. Administrator endpoint.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Request>, ApiError> {
        let value = self.gateway.call(Method::GET, "/admin/requests/", None).await?;
        parse(value)
    }

    /// Update status and/or priority in one call. Administrator endpoint.
    ///
    /// At least one field must be set; an empty update fails locally without
    /// touching the network, mirroring the server's 400.
    #[instrument(skip(self, update), fields(status = ?update.status, priority = ?update.priority))]
    pub async fn update(&self, id: i64, update: &RequestUpdate) -> Result<Request, ApiError> {
        if update.is_empty() {
            return Err(ApiError::RequestFailed(
                "no fields to update, set status and/or priority".to_string(),
            ));
        }
        let body = serde_json::to_value(update)?;
        let value = self
            .gateway
            .call(Method::PATCH, &format!("/admin/requests/{id}/"), Some(body))
            .await?;
        parse_request(value)
    }

    /// Assign the request to an administrator, or unassign with `None`.
    /// Administrator endpoint.
    #[instrument(skip(self))]
    pub async fn assign(&self, id: i64, assignee: Option<i64>) -> Result<Request, ApiError> {
        let body = json!({ "assigned_to": assignee });
        let value = self
            .gateway
            .call(Method::POST, &format!("/admin/requests/{id}/assign/"), Some(body))
            .await?;
        parse_request(value)
    }

    /// Delete a request outright. Administrator endpoint.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway
            .call(Method::DELETE, &format!("/admin/requests/{id}/"), None)
            .await?;
        Ok(())
    }

    /// Activity log for a request. `scope` picks the own-request or the
    /// administrator endpoint.
    #[instrument(skip(self))]
    pub async fn activities(
        &self,
        id: i64,
        scope: ActivityScope,
    ) -> Result<Vec<Activity>, ApiError> {
        let path = match scope {
            ActivityScope::Own => format!("/requests/{id}/activities/"),
            ActivityScope::Admin => format!("/admin/requests/{id}/activities/"),
        };
        let value = self.gateway.call(Method::GET, &path, None).await?;
        parse(value)
    }

    /// Profile of the authenticated identity.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let value = self.gateway.call(Method::GET, "/auth/me/", None).await?;
        parse(value)
    }
}

/// Mutation endpoints wrap the record as `{success, message, request}`;
/// tolerate a bare record too.
fn parse_request(mut value: Value) -> Result<Request, ApiError> {
    if let Some(inner) = value.get_mut("request") {
        value = inner.take();
    }
    parse(value)
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(value)?)
}
