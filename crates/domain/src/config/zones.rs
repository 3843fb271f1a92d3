use super::errors::ConfigError;
use crate::fqdn::Fqdn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Type key that marks a host as proxied. Its values are upstream addresses.
pub const PROXY_TYPE_KEY: &str = "proxy";

pub type HostRecords = BTreeMap<String, Vec<String>>;

/// `zone -> host -> record type -> values`, exactly as written in the file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ZonesConfig(pub BTreeMap<String, BTreeMap<String, HostRecords>>);

impl ZonesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn zones(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, HostRecords>)> {
        self.0.iter().map(|(zone, hosts)| (zone.as_str(), hosts))
    }

    /// Adds (or extends) `zone/host/rtype` with `values`.
    pub fn insert(&mut self, zone: &str, host: &str, rtype: &str, values: &[&str]) {
        self.0
            .entry(zone.to_string())
            .or_default()
            .entry(host.to_string())
            .or_default()
            .entry(rtype.to_string())
            .or_default()
            .extend(values.iter().map(|v| v.to_string()));
    }

    pub fn host_count(&self) -> usize {
        self.0.values().map(|hosts| hosts.len()).sum()
    }

    pub fn proxied_hosts(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.0.iter().flat_map(|(zone, hosts)| {
            hosts.iter().filter_map(move |(host, records)| {
                records
                    .iter()
                    .find(|(rtype, _)| rtype.eq_ignore_ascii_case(PROXY_TYPE_KEY))
                    .map(|(_, values)| (zone.as_str(), host.as_str(), values.as_slice()))
            })
        })
    }

    /// Every proxied host must have exactly one non-empty `proxy` entry and
    /// be proxied by a single zone, so the record table and the upstream
    /// directory agree on where its candidates live.
    pub fn check_proxied_hosts(&self) -> Result<(), ConfigError> {
        let mut owners: HashMap<String, &str> = HashMap::new();

        for (zone, hosts) in self.zones() {
            for (host, records) in hosts {
                let mut proxy_keys = records
                    .iter()
                    .filter(|(rtype, _)| rtype.eq_ignore_ascii_case(PROXY_TYPE_KEY));

                let Some((_, upstreams)) = proxy_keys.next() else {
                    continue;
                };

                if proxy_keys.next().is_some() {
                    return Err(ConfigError::Validation(format!(
                        "Proxied host '{}' in zone '{}' declares more than one proxy entry",
                        host, zone
                    )));
                }

                if upstreams.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "Proxied host '{}' in zone '{}' has no upstream servers",
                        host, zone
                    )));
                }

                let key = Fqdn::parse(host)
                    .map(|name| name.as_str().to_string())
                    .unwrap_or_else(|_| host.to_ascii_lowercase());

                if let Some(first) = owners.insert(key, zone) {
                    return Err(ConfigError::Validation(format!(
                        "Host '{}' is proxied by both zone '{}' and zone '{}'",
                        host, first, zone
                    )));
                }
            }
        }

        Ok(())
    }
}
