//! Client configuration.

use std::time::Duration;

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the sync client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the sync server, e.g. `http://localhost:3000`.
    pub server_url: String,
    /// Per-request timeout. A request that outlives it fails the cycle
    /// like any other transport error.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration with the default timeout.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
