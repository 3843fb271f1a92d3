use super::transport::UdpTransport;
use async_trait::async_trait;
use hickory_proto::op::Message;
use proxyzone_dns_application::ports::UpstreamClient;
use proxyzone_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Single-attempt UDP exchange with an upstream server.
pub struct UdpUpstreamClient {
    timeout: Duration,
}

impl UdpUpstreamClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl UpstreamClient for UdpUpstreamClient {
    async fn exchange(
        &self,
        request: &Message,
        target: SocketAddr,
    ) -> Result<Message, DomainError> {
        let bytes = request
            .to_vec()
            .map_err(|e| DomainError::InvalidDnsMessage(format!("Failed to encode query: {}", e)))?;

        let response = UdpTransport::new(target).send(&bytes, self.timeout).await?;

        let message = Message::from_vec(&response).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Unparseable response from {}: {}", target, e))
        })?;

        if message.id() != request.id() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response id {} from {} does not match query id {}",
                message.id(),
                target,
                request.id()
            )));
        }

        debug!(
            server = %target,
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            "Upstream exchange complete"
        );

        Ok(message)
    }
}
