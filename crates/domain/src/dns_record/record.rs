use super::RecordType;
use crate::fqdn::Fqdn;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const DNS_CLASS_IN: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(Fqdn),
    Ns(Fqdn),
    Ptr(Fqdn),
    Mx {
        preference: u16,
        exchange: Fqdn,
    },
    Txt(String),
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: Fqdn,
    },
    Soa {
        mname: Fqdn,
        rname: Fqdn,
        serial: u32,
        refresh: i32,
        retry: i32,
        expire: i32,
        minimum: u32,
    },
    /// Upstream server for a proxied host.
    Proxy(IpAddr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub owner: Fqdn,

    pub record_type: RecordType,

    pub class: u16,

    pub ttl: u32,

    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(owner: Fqdn, ttl: u32, data: RecordData) -> Self {
        let record_type = data.record_type();
        Self {
            owner,
            record_type,
            class: DNS_CLASS_IN,
            ttl,
            data,
        }
    }

    /// Builds a record from the presentation form of its value
    /// (`"192.0.2.1"`, `"10 mail.example.com"`, ...).
    pub fn parse(
        owner: Fqdn,
        record_type: RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<Self, String> {
        let data = RecordData::parse(record_type, value)?;
        Ok(Self::new(owner, ttl, data))
    }

    pub fn is_proxy(&self) -> bool {
        self.record_type == RecordType::PROXY
    }
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::Aaaa(_) => RecordType::AAAA,
            RecordData::Cname(_) => RecordType::CNAME,
            RecordData::Ns(_) => RecordType::NS,
            RecordData::Ptr(_) => RecordType::PTR,
            RecordData::Mx { .. } => RecordType::MX,
            RecordData::Txt(_) => RecordType::TXT,
            RecordData::Srv { .. } => RecordType::SRV,
            RecordData::Soa { .. } => RecordType::SOA,
            RecordData::Proxy(_) => RecordType::PROXY,
        }
    }

    pub fn parse(record_type: RecordType, value: &str) -> Result<Self, String> {
        let value = value.trim();
        match record_type {
            RecordType::A => value
                .parse::<Ipv4Addr>()
                .map(RecordData::A)
                .map_err(|e| e.to_string()),
            RecordType::AAAA => value
                .parse::<Ipv6Addr>()
                .map(RecordData::Aaaa)
                .map_err(|e| e.to_string()),
            RecordType::CNAME => parse_name(value).map(RecordData::Cname),
            RecordType::NS => parse_name(value).map(RecordData::Ns),
            RecordType::PTR => parse_name(value).map(RecordData::Ptr),
            RecordType::MX => {
                let fields = split_fields(value, 2)?;
                Ok(RecordData::Mx {
                    preference: parse_number(fields[0], "preference")?,
                    exchange: parse_name(fields[1])?,
                })
            }
            RecordType::TXT => Ok(RecordData::Txt(unquote(value).to_string())),
            RecordType::SRV => {
                let fields = split_fields(value, 4)?;
                Ok(RecordData::Srv {
                    priority: parse_number(fields[0], "priority")?,
                    weight: parse_number(fields[1], "weight")?,
                    port: parse_number(fields[2], "port")?,
                    target: parse_name(fields[3])?,
                })
            }
            RecordType::SOA => {
                let fields = split_fields(value, 7)?;
                Ok(RecordData::Soa {
                    mname: parse_name(fields[0])?,
                    rname: parse_name(fields[1])?,
                    serial: parse_number(fields[2], "serial")?,
                    refresh: parse_number(fields[3], "refresh")?,
                    retry: parse_number(fields[4], "retry")?,
                    expire: parse_number(fields[5], "expire")?,
                    minimum: parse_number(fields[6], "minimum")?,
                })
            }
            RecordType::PROXY => value
                .parse::<IpAddr>()
                .map(RecordData::Proxy)
                .map_err(|e| format!("upstream must be an IP address: {}", e)),
            RecordType::OPT => Err("OPT is a pseudo-record and cannot be declared".to_string()),
        }
    }
}

fn parse_name(value: &str) -> Result<Fqdn, String> {
    Fqdn::parse(value).map_err(|e| e.to_string())
}

fn parse_number<T: std::str::FromStr>(field: &str, what: &str) -> Result<T, String> {
    field
        .parse::<T>()
        .map_err(|_| format!("invalid {} '{}'", what, field))
}

fn split_fields(value: &str, expected: usize) -> Result<Vec<&str>, String> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    if fields.len() != expected {
        return Err(format!(
            "expected {} fields, got {}",
            expected,
            fields.len()
        ));
    }
    Ok(fields)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
