use crate::config::{ConfigError, ZonesConfig};
use crate::dns_record::{RecordType, ResourceRecord};
use crate::fqdn::Fqdn;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLookup<'a> {
    NameNotFound,
    TypeNotFound,
    Found(&'a [ResourceRecord]),
}

#[derive(Debug, Clone, Default)]
struct HostEntry {
    /// Zone that declared the PROXY marker for this host.
    proxy_zone: Option<Arc<str>>,
    records: HashMap<RecordType, Vec<ResourceRecord>>,
}

/// Read-only `name -> type -> records` table built from the zones document.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    hosts: HashMap<Fqdn, HostEntry>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(zones: &ZonesConfig, ttl: u32) -> Result<Self, ConfigError> {
        let mut store = Self::new();

        for (zone, hosts) in zones.zones() {
            for (host, records) in hosts {
                let owner = Fqdn::parse(host)
                    .map_err(|e| ConfigError::InvalidName(host.clone(), e.to_string()))?;

                for (type_str, values) in records {
                    let record_type = RecordType::from_str(type_str)
                        .ok()
                        .filter(RecordType::is_storable)
                        .ok_or_else(|| ConfigError::UnknownRecordType {
                            host: host.clone(),
                            rtype: type_str.clone(),
                        })?;

                    for value in values {
                        let record = ResourceRecord::parse(owner.clone(), record_type, value, ttl)
                            .map_err(|reason| ConfigError::MalformedRecord {
                                host: host.clone(),
                                rtype: record_type.to_string(),
                                value: value.clone(),
                                reason,
                            })?;
                        store.insert(zone, record);
                    }
                }

                // A host declared with no values is still a known name.
                store.hosts.entry(owner).or_default();
            }
        }

        Ok(store)
    }

    pub fn insert(&mut self, zone: &str, record: ResourceRecord) {
        let entry = self.hosts.entry(record.owner.clone()).or_default();
        if record.is_proxy() && entry.proxy_zone.is_none() {
            entry.proxy_zone = Some(Arc::from(zone));
        }
        entry
            .records
            .entry(record.record_type)
            .or_default()
            .push(record);
    }

    pub fn lookup(&self, name: &Fqdn, record_type: RecordType) -> RecordLookup<'_> {
        match self.hosts.get(name) {
            None => RecordLookup::NameNotFound,
            Some(entry) => match entry.records.get(&record_type) {
                Some(records) if !records.is_empty() => RecordLookup::Found(records),
                _ => RecordLookup::TypeNotFound,
            },
        }
    }

    /// Lookup by wire type code. A code with no known type can only be
    /// `TypeNotFound` for an existing name.
    pub fn lookup_code(&self, name: &Fqdn, qtype: u16) -> RecordLookup<'_> {
        match RecordType::from_u16(qtype) {
            Some(record_type) => self.lookup(name, record_type),
            None if self.contains(name) => RecordLookup::TypeNotFound,
            None => RecordLookup::NameNotFound,
        }
    }

    pub fn contains(&self, name: &Fqdn) -> bool {
        self.hosts.contains_key(name)
    }

    pub fn is_proxied(&self, name: &Fqdn) -> bool {
        matches!(self.lookup(name, RecordType::PROXY), RecordLookup::Found(_))
    }

    pub fn proxy_zone(&self, name: &Fqdn) -> Option<&str> {
        self.hosts
            .get(name)
            .and_then(|entry| entry.proxy_zone.as_deref())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn proxied_len(&self) -> usize {
        self.hosts
            .values()
            .filter(|entry| entry.records.contains_key(&RecordType::PROXY))
            .count()
    }
}
