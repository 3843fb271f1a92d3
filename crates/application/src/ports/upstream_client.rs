use async_trait::async_trait;
use hickory_proto::op::Message;
use proxyzone_dns_domain::DomainError;
use std::net::SocketAddr;

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// One request/response exchange with `target`. No retry.
    ///
    /// The request id goes out unchanged so the caller can correlate the reply.
    async fn exchange(&self, request: &Message, target: SocketAddr)
        -> Result<Message, DomainError>;
}
