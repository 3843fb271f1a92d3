use crate::config::{ConfigError, ZonesConfig};
use crate::dns_record::RecordType;
use crate::fqdn::Fqdn;
use std::collections::HashMap;
use std::net::IpAddr;

/// `zone -> host (no trailing dot) -> ordered upstream servers`.
#[derive(Debug, Clone, Default)]
pub struct ProxyDirectory {
    zones: HashMap<String, HashMap<String, Vec<IpAddr>>>,
}

impl ProxyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(zones: &ZonesConfig) -> Result<Self, ConfigError> {
        let mut directory = Self::new();

        for (zone, host, values) in zones.proxied_hosts() {
            let name = Fqdn::parse(host)
                .map_err(|e| ConfigError::InvalidName(host.to_string(), e.to_string()))?;

            let upstreams = values
                .iter()
                .map(|value| {
                    value
                        .trim()
                        .parse::<IpAddr>()
                        .map_err(|e| ConfigError::MalformedRecord {
                            host: host.to_string(),
                            rtype: RecordType::PROXY.to_string(),
                            value: value.clone(),
                            reason: e.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            directory.insert(zone, name.trimmed(), upstreams);
        }

        Ok(directory)
    }

    pub fn insert(&mut self, zone: &str, host: &str, upstreams: Vec<IpAddr>) {
        self.zones
            .entry(zone.to_string())
            .or_default()
            .entry(host.to_string())
            .or_default()
            .extend(upstreams);
    }

    /// Upstreams for `host` in `zone`, in configured order. Empty when unknown.
    pub fn candidates(&self, zone: &str, host: &str) -> &[IpAddr] {
        self.zones
            .get(zone)
            .and_then(|hosts| hosts.get(host))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }
}
