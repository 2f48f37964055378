use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// The single downstream resolver every cache miss is forwarded to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_server")]
    pub server: String,

    /// Per-query timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl UpstreamConfig {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.server.parse().ok()
    }
}

fn default_server() -> String {
    "1.1.1.1:53".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}
