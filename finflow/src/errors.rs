//! Error types for the finflow client.
//!
//! The pipeline distinguishes three classes of failure so that callers can
//! react correctly without owning any retry logic themselves: an
//! authentication failure that was surfaced without recovery, a terminal
//! refresh failure that has already cleared the session, and everything else
//! (connectivity, timeouts, non-auth server errors).

use thiserror::Error;

/// The main error type for finflow client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the request with 401 before any refresh recovery
    /// ran. Only the endpoints called outside a session (login, register)
    /// produce this variant.
    #[error("unauthenticated: {message}")]
    Unauthenticated {
        /// Server-provided detail, if any.
        message: String,
    },

    /// The token refresh itself was rejected or unreachable. By the time
    /// this error is returned the credential set has been cleared; the
    /// caller must re-authenticate.
    #[error("session expired: {message}")]
    RefreshFailed {
        /// What went wrong with the refresh attempt.
        message: String,
    },

    /// A non-2xx response from the server, surfaced unrecovered. Carries
    /// the server's error payload unmodified when one was present. A 401
    /// here means the post-refresh retry was rejected again; it classifies
    /// as [`FailureKind::Unauthenticated`] and is never retried further.
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided error message, or a generic fallback.
        message: String,
    },

    /// The request could not be delivered (DNS, connect, TLS, ...).
    #[error("network error: {message}")]
    Network {
        /// Underlying transport error description.
        message: String,
    },

    /// The request deadline elapsed before a response arrived.
    #[error("timeout during {phase}")]
    Timeout {
        /// Which attempt timed out ("request" or "retry").
        phase: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse failure classification matching the pipeline's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 401 surfaced to the caller.
    Unauthenticated,
    /// Terminal refresh failure; credentials are gone.
    RefreshFailed,
    /// Connectivity, timeout, or any non-auth server error.
    NetworkOrServer,
}

impl ClientError {
    /// Creates an unauthenticated error.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Creates a refresh-failed error.
    #[must_use]
    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            message: message.into(),
        }
    }

    /// Creates an API error from a status code and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a timeout error for the given attempt phase.
    #[must_use]
    pub fn timeout(phase: impl Into<String>) -> Self {
        Self::Timeout {
            phase: phase.into(),
        }
    }

    /// Collapses the error into the three-way failure taxonomy.
    ///
    /// Every 401 surfaced to the caller classifies as `Unauthenticated`,
    /// whether it predates a refresh attempt or rejected the post-refresh
    /// retry, so callers can always tell "re-authenticate" apart from a
    /// transient server or network problem.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unauthenticated { .. } | Self::Api { status: 401, .. } => {
                FailureKind::Unauthenticated
            }
            Self::RefreshFailed { .. } => FailureKind::RefreshFailed,
            Self::Api { .. } | Self::Network { .. } | Self::Timeout { .. } | Self::Serialization(_) => {
                FailureKind::NetworkOrServer
            }
        }
    }

    /// Whether this error means the caller must re-authenticate.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::Unauthenticated | FailureKind::RefreshFailed
        )
    }
}
