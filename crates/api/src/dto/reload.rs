use proxyzone_dns_application::use_cases::ReloadSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub hosts: usize,
    pub proxied_hosts: usize,
}

impl From<ReloadSummary> for ReloadResponse {
    fn from(summary: ReloadSummary) -> Self {
        Self {
            success: true,
            hosts: summary.hosts,
            proxied_hosts: summary.proxied_hosts,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
