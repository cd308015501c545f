//! Configuration for the finflow client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the API client.
///
/// The base URL is a required input rather than a baked-in literal, so the
/// same binary can point at a local backend, a container, or a deployment
/// without recompiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API server, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Deadline for the original request and the post-refresh retry, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Deadline for the token refresh request, in seconds.
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_seconds: f64,
    /// User agent string sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_refresh_timeout() -> f64 {
    10.0
}

fn default_user_agent() -> String {
    concat!("finflow-client/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout(),
            refresh_timeout_seconds: default_refresh_timeout(),
            user_agent: default_user_agent(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the refresh timeout.
    #[must_use]
    pub fn with_refresh_timeout(mut self, seconds: f64) -> Self {
        self.refresh_timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Gets the request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    /// Gets the refresh timeout as a `Duration`.
    #[must_use]
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.refresh_timeout_seconds)
    }

    /// Resolves a relative API path against the base URL.
    ///
    /// Tolerates a trailing slash on the base URL and a missing leading
    /// slash on the path.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
