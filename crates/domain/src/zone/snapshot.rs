use super::{ProxyDirectory, RecordStore};
use crate::config::{Config, ConfigError, ZonesConfig};

/// One fully built generation of zone data. Replaced as a whole on reload.
#[derive(Debug, Clone, Default)]
pub struct ZoneSnapshot {
    pub store: RecordStore,
    pub directory: ProxyDirectory,
}

impl ZoneSnapshot {
    pub fn build(zones: &ZonesConfig, ttl: u32) -> Result<Self, ConfigError> {
        zones.check_proxied_hosts()?;

        Ok(Self {
            store: RecordStore::build(zones, ttl)?,
            directory: ProxyDirectory::build(zones)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::build(&config.zones, config.zones_ttl)
    }
}
