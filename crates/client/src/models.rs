//! Wire types for the Helix API.

use chrono::{DateTime, Utc};
use helix_lifecycle::{Priority, Status};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A service request.
///
/// `title`, `description`, and the requester identity are immutable from the
/// client's perspective; `status` is mutated only through the lifecycle
/// controller, `priority` and the assignee through their own operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Server-assigned identifier, opaque to the client.
    pub id: i64,
    /// Short title, set at creation.
    pub title: String,
    /// Detailed description, set at creation.
    #[serde(default)]
    pub description: String,
    /// Current workflow status.
    pub status: Status,
    /// Current priority.
    #[serde(default)]
    pub priority: Priority,
    /// Email of the requester.
    #[serde(default)]
    pub user_email: Option<String>,
    /// Id of the administrator handling this request, if any.
    #[serde(default)]
    pub assigned_to: Option<i64>,
    /// Email of the assigned administrator.
    #[serde(default)]
    pub assigned_to_email: Option<String>,
    /// Set by the server at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the server on every accepted mutation.
    pub updated_at: DateTime<Utc>,
}

impl Request {
    /// True when the current status has no outgoing transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Kind of action recorded in a request's activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityAction {
    Created,
    StatusChanged,
    Assigned,
    Unassigned,
    /// An action string this client does not recognize.
    Unknown(String),
}

impl ActivityAction {
    /// Wire representation of this action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ActivityAction::Created => "CREATED",
            ActivityAction::StatusChanged => "STATUS_CHANGED",
            ActivityAction::Assigned => "ASSIGNED",
            ActivityAction::Unassigned => "UNASSIGNED",
            ActivityAction::Unknown(label) => label,
        }
    }
}

impl From<String> for ActivityAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREATED" => ActivityAction::Created,
            "STATUS_CHANGED" => ActivityAction::StatusChanged,
            "ASSIGNED" => ActivityAction::Assigned,
            "UNASSIGNED" => ActivityAction::Unassigned,
            _ => ActivityAction::Unknown(value),
        }
    }
}

impl From<ActivityAction> for String {
    fn from(action: ActivityAction) -> Self {
        action.as_str().to_owned()
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit entry tied to a request.
///
/// Created server-side on every accepted mutation; the client only reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Server-assigned identifier.
    pub id: i64,
    /// What happened.
    pub action: ActivityAction,
    /// Human-readable description of the action.
    #[serde(default)]
    pub detail: String,
    /// Identity that performed the action, when known.
    #[serde(default)]
    pub performed_by_email: Option<String>,
    /// When the action occurred.
    pub timestamp: DateTime<Utc>,
}

/// Authorization role of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Admin,
    /// A role string this client does not recognize.
    Unknown(String),
}

impl Role {
    /// Wire representation of this role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::Unknown(label) => label,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "USER" => Role::User,
            "ADMIN" => Role::Admin,
            _ => Role::Unknown(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_owned()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of the authenticated identity, from `/auth/me/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider uid.
    pub uid: String,
    pub email: String,
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
}

impl UserProfile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Payload for creating a request.
#[derive(Debug, Clone, Serialize)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    /// Defaults to `MEDIUM` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl NewRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Partial update for a request; at least one field must be set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl RequestUpdate {
    /// Update carrying only a status change.
    #[must_use]
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Update carrying only a priority change.
    #[must_use]
    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    /// True when neither field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }
}

/// Which activity endpoint to read.
///
/// Picked by caller context; the server enforces access either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    /// The requester's own request.
    Own,
    /// Any request (administrator).
    Admin,
}
