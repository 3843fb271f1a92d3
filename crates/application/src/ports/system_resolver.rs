use async_trait::async_trait;
use proxyzone_dns_domain::DomainError;
use std::net::IpAddr;

/// Source of the host's default resolver.
#[async_trait]
pub trait SystemResolver: Send + Sync {
    /// First entry of the resolver list.
    async fn primary_nameserver(&self) -> Result<IpAddr, DomainError>;
}
