//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::inbound::http::auth::ApiKeyPolicy;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) api_key_policy: ApiKeyPolicy,
}

impl ServerConfig {
    /// Construct a configuration binding to `bind_addr` with no
    /// authentication.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            api_key_policy: ApiKeyPolicy::disabled(),
        }
    }

    /// Require the given API key on directory endpoints.
    #[must_use]
    pub fn with_api_key_policy(mut self, policy: ApiKeyPolicy) -> Self {
        self.api_key_policy = policy;
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
