//! proxyzone-dns domain layer
pub mod config;
pub mod dns_record;
pub mod dns_request;
pub mod errors;
pub mod fqdn;
pub mod zone;

pub use config::{CliOverrides, Config, ConfigError, ZonesConfig};
pub use dns_record::{RecordData, RecordType, ResourceRecord, DNS_CLASS_IN};
pub use dns_request::{DnsRequest, Question};
pub use errors::DomainError;
pub use fqdn::Fqdn;
pub use zone::{ProxyDirectory, RecordLookup, RecordStore, ZoneSnapshot};
