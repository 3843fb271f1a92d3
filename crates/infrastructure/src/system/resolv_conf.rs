use async_trait::async_trait;
use proxyzone_dns_application::ports::SystemResolver;
use proxyzone_dns_domain::DomainError;
use std::net::IpAddr;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, warn};

/// Reads the first `nameserver` line of a resolv.conf file on every call,
/// so edits to the file apply to the next probe.
pub struct ResolvConfResolver {
    path: String,
}

impl ResolvConfResolver {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// The first `nameserver` entry in resolv.conf syntax. Later entries are
/// never consulted, even when the first one is unusable.
pub fn parse_first_nameserver(content: &str) -> Result<IpAddr, DomainError> {
    // Format:
    // # comment
    // nameserver 127.0.0.53
    // nameserver fe80::1%eth0
    let entry = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .find_map(|line| {
            let mut fields = line.split_whitespace();
            (fields.next() == Some("nameserver")).then(|| fields.next())
        })
        .ok_or_else(|| DomainError::NoSystemResolver("no nameserver entry".to_string()))?;

    let value = entry.ok_or_else(|| {
        DomainError::NoSystemResolver("first nameserver entry has no address".to_string())
    })?;

    // Zone index is not part of the address.
    let addr = value.split('%').next().unwrap_or(value);
    IpAddr::from_str(addr).map_err(|e| {
        warn!(error = %e, value, "Invalid first nameserver in resolv.conf");
        DomainError::NoSystemResolver(format!("invalid first nameserver '{}': {}", value, e))
    })
}

#[async_trait]
impl SystemResolver for ResolvConfResolver {
    async fn primary_nameserver(&self) -> Result<IpAddr, DomainError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::NoSystemResolver(format!("Failed to read {}: {}", self.path, e))
        })?;

        let nameserver = parse_first_nameserver(&content).map_err(|e| match e {
            DomainError::NoSystemResolver(reason) => {
                DomainError::NoSystemResolver(format!("{} in {}", reason, self.path))
            }
            other => other,
        })?;

        debug!(path = %self.path, nameserver = %nameserver, "System resolver");
        Ok(nameserver)
    }
}

/// Fixed probe resolver from configuration.
pub struct StaticResolver {
    nameserver: IpAddr,
}

impl StaticResolver {
    pub fn new(nameserver: IpAddr) -> Self {
        Self { nameserver }
    }
}

#[async_trait]
impl SystemResolver for StaticResolver {
    async fn primary_nameserver(&self) -> Result<IpAddr, DomainError> {
        Ok(self.nameserver)
    }
}
