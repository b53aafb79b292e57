//! Error taxonomy for the Helix API client.

use helix_lifecycle::Status;
use thiserror::Error;

/// Classified failure for every client operation.
///
/// The gateway never lets a transport-level fault escape unclassified: every
/// error a caller sees is one of these kinds. [`ApiError::SessionExpired`] is
/// the only kind with a forced side effect: the token provider has already
/// been signed out by the time it is returned. All other kinds are
/// informational; the caller displays them and lets the user retry.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential is available. The network was never contacted.
    #[error("not signed in")]
    Unauthenticated,

    /// The server rejected the session as stale (401 with an auth/token
    /// marker in the body). The local identity has been signed out.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// A 401 not attributable to a stale session. The identity is kept.
    #[error("backend authentication error, please try again")]
    AuthBackend,

    /// Authenticated but not permitted (403).
    #[error("you do not have permission to perform this action")]
    Forbidden,

    /// Any other non-2xx response, carrying the server's message when one
    /// could be parsed out of the body.
    #[error("{0}")]
    RequestFailed(String),

    /// Network unreachable or a malformed response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The requested status change is not an edge of the transition table.
    /// Rejected locally; nothing was sent to the server.
    #[error("cannot transition from {from} to {to}")]
    IllegalTransition {
        /// Status the request was in when the change was attempted.
        from: Status,
        /// Status the change asked for.
        to: Status,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}
