//! Request lifecycle states and the workflow transition table.
//!
//! The status graph is fixed and acyclic:
//!
//! ```text
//! PENDING → REVIEWING → IN_PROGRESS → COMPLETED → DELIVERED → CLOSED
//!    │          │            │
//!    │          ├→ REJECTED  │
//!    └──────────┴────────────┴→ CANCELLED
//! ```
//!
//! `CLOSED`, `REJECTED`, and `CANCELLED` are terminal. The table here must
//! stay in lockstep with the server's own enforcement: the client-side check
//! is a UX guard, and the server remains the final authority on every
//! transition (it can still reject one the client allowed, e.g. after a race
//! with another administrator).

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a request.
///
/// Unrecognized wire values are preserved as [`Status::Unknown`] so a newer
/// server state renders as an opaque label instead of breaking
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Submitted, not yet triaged.
    Pending,
    /// Under review by an administrator.
    Reviewing,
    /// Accepted and being worked on.
    InProgress,
    /// Work finished, awaiting delivery.
    Completed,
    /// Delivered to the requester.
    Delivered,
    /// Acknowledged by the requester. Terminal.
    Closed,
    /// Declined during triage or review. Terminal.
    Rejected,
    /// Withdrawn before completion. Terminal.
    Cancelled,
    /// A status string this client does not recognize.
    Unknown(String),
}

impl Status {
    /// The full set of statuses this client knows about.
    pub const KNOWN: [Status; 8] = [
        Status::Pending,
        Status::Reviewing,
        Status::InProgress,
        Status::Completed,
        Status::Delivered,
        Status::Closed,
        Status::Rejected,
        Status::Cancelled,
    ];

    /// Wire representation of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "PENDING",
            Status::Reviewing => "REVIEWING",
            Status::InProgress => "IN_PROGRESS",
            Status::Completed => "COMPLETED",
            Status::Delivered => "DELIVERED",
            Status::Closed => "CLOSED",
            Status::Rejected => "REJECTED",
            Status::Cancelled => "CANCELLED",
            Status::Unknown(label) => label,
        }
    }

    /// Statuses reachable from this one in a single step.
    ///
    /// Total over the enumeration; unknown statuses have no sanctioned
    /// transitions.
    #[must_use]
    pub fn allowed_next(&self) -> &'static [Status] {
        match self {
            Status::Pending => &[Status::Reviewing, Status::Rejected, Status::Cancelled],
            Status::Reviewing => &[Status::InProgress, Status::Rejected, Status::Cancelled],
            Status::InProgress => &[Status::Completed, Status::Cancelled],
            Status::Completed => &[Status::Delivered],
            Status::Delivered => &[Status::Closed],
            Status::Closed | Status::Rejected | Status::Cancelled | Status::Unknown(_) => &[],
        }
    }

    /// Whether moving to `target` is legal: either a self-transition (no-op)
    /// or an outgoing edge of the current status.
    #[must_use]
    pub fn allows_transition_to(&self, target: &Status) -> bool {
        target == self || self.allowed_next().contains(target)
    }

    /// True when this status has no outgoing transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Status::Pending,
            "REVIEWING" => Status::Reviewing,
            "IN_PROGRESS" => Status::InProgress,
            "COMPLETED" => Status::Completed,
            "DELIVERED" => Status::Delivered,
            "CLOSED" => Status::Closed,
            "REJECTED" => Status::Rejected,
            "CANCELLED" => Status::Cancelled,
            _ => Status::Unknown(value),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a request.
///
/// Priorities are unordered from the workflow's point of view: any priority
/// may change to any other at any time, and no transition table applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
    /// A priority string this client does not recognize.
    Unknown(String),
}

impl Priority {
    /// The full set of priorities this client knows about.
    pub const KNOWN: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Wire representation of this priority.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
            Priority::Unknown(label) => label,
        }
    }
}

impl Default for Priority {
    /// New requests default to `MEDIUM`.
    fn default() -> Self {
        Priority::Medium
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "LOW" => Priority::Low,
            "MEDIUM" => Priority::Medium,
            "HIGH" => Priority::High,
            "URGENT" => Priority::Urgent,
            _ => Priority::Unknown(value),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_owned()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_transition_is_always_allowed() {
        for status in Status::KNOWN {
            assert!(
                status.allows_transition_to(&status),
                "{status} should allow a no-op self-transition"
            );
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for status in [Status::Closed, Status::Rejected, Status::Cancelled] {
            assert!(status.is_terminal());
            assert!(status.allowed_next().is_empty());
            for target in Status::KNOWN {
                if target != status {
                    assert!(
                        !status.allows_transition_to(&target),
                        "{status} must not transition to {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn non_terminal_statuses_are_not_terminal() {
        for status in [
            Status::Pending,
            Status::Reviewing,
            Status::InProgress,
            Status::Completed,
            Status::Delivered,
        ] {
            assert!(!status.is_terminal(), "{status} has outgoing edges");
        }
    }

    #[test]
    fn sample_edges_match_the_table() {
        assert!(Status::Pending.allows_transition_to(&Status::Reviewing));
        assert!(!Status::Pending.allows_transition_to(&Status::Delivered));
        assert!(!Status::Closed.allows_transition_to(&Status::Pending));
        assert!(Status::Reviewing.allows_transition_to(&Status::Rejected));
        assert!(Status::InProgress.allows_transition_to(&Status::Completed));
        assert!(Status::Completed.allows_transition_to(&Status::Delivered));
        assert!(Status::Delivered.allows_transition_to(&Status::Closed));
    }

    #[test]
    fn no_transitions_skip_backwards_or_ahead() {
        assert!(!Status::Reviewing.allows_transition_to(&Status::Pending));
        assert!(!Status::InProgress.allows_transition_to(&Status::Reviewing));
        assert!(!Status::Pending.allows_transition_to(&Status::Completed));
        assert!(!Status::Completed.allows_transition_to(&Status::Closed));
    }

    #[test]
    fn cancellation_is_only_reachable_before_completion() {
        assert!(Status::Pending.allows_transition_to(&Status::Cancelled));
        assert!(Status::Reviewing.allows_transition_to(&Status::Cancelled));
        assert!(Status::InProgress.allows_transition_to(&Status::Cancelled));
        assert!(!Status::Completed.allows_transition_to(&Status::Cancelled));
        assert!(!Status::Delivered.allows_transition_to(&Status::Cancelled));
    }

    #[test]
    fn unknown_status_round_trips_as_opaque_label() {
        let status = Status::from("ARCHIVED".to_string());
        assert_eq!(status, Status::Unknown("ARCHIVED".to_string()));
        assert_eq!(status.to_string(), "ARCHIVED");
        assert!(status.allowed_next().is_empty());

        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"ARCHIVED\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn status_wire_format_is_screaming_snake_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let back: Status = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(back, Status::InProgress);
    }

    #[test]
    fn priorities_are_unordered_and_default_to_medium() {
        // There is deliberately no transition table for priorities: the type
        // exposes no edge set, so every pair of priorities is a legal change.
        assert_eq!(Priority::KNOWN.len(), 4);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn priority_round_trips_including_unknown() {
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, "\"URGENT\"");
        let odd: Priority = serde_json::from_str("\"BLOCKER\"").unwrap();
        assert_eq!(odd, Priority::Unknown("BLOCKER".to_string()));
        assert_eq!(serde_json::to_string(&odd).unwrap(), "\"BLOCKER\"");
    }
}
