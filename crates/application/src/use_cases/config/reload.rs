use crate::ports::ZoneStore;
use proxyzone_dns_domain::{CliOverrides, Config, DomainError, ZoneSnapshot};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSummary {
    pub hosts: usize,
    pub proxied_hosts: usize,
}

pub struct ReloadZonesUseCase {
    zones: Arc<dyn ZoneStore>,
    config_path: Option<String>,
}

impl ReloadZonesUseCase {
    pub fn new(zones: Arc<dyn ZoneStore>, config_path: Option<String>) -> Self {
        Self { zones, config_path }
    }

    /// Rebuilds the zone tables from the configuration file and swaps them in.
    ///
    /// On any error the live generation is left untouched.
    pub async fn execute(&self) -> Result<ReloadSummary, DomainError> {
        let config = Config::load(self.config_path.as_deref(), CliOverrides::default())
            .map_err(|e| DomainError::ConfigError(format!("Config load error: {}", e)))?;

        config
            .validate()
            .map_err(|e| DomainError::ConfigError(format!("Config validation error: {}", e)))?;

        let snapshot = ZoneSnapshot::from_config(&config)
            .map_err(|e| DomainError::ConfigError(format!("Zone build error: {}", e)))?;

        let summary = ReloadSummary {
            hosts: snapshot.store.len(),
            proxied_hosts: snapshot.store.proxied_len(),
        };

        self.zones.replace(snapshot);

        info!(
            path = self.config_path.as_deref().unwrap_or("<default>"),
            hosts = summary.hosts,
            proxied_hosts = summary.proxied_hosts,
            "Zones reloaded"
        );

        Ok(summary)
    }
}
