use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the outbound half of the proxy chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// File whose first `nameserver` entry receives the probe query.
    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,

    /// Explicit probe resolver; takes precedence over `resolv_conf`.
    #[serde(default)]
    pub nameserver: Option<String>,

    /// Port appended to the probe resolver and every candidate server.
    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    /// Per-exchange timeout in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            resolv_conf: default_resolv_conf(),
            nameserver: None,
            upstream_port: default_upstream_port(),
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_upstream_port() -> u16 {
    53
}

fn default_query_timeout() -> u64 {
    5
}
