//! UDP transport for DNS exchanges (RFC 1035 §4.2.1)
//!
//! One ephemeral socket per exchange, messages sent as-is (no framing).
//! Datagrams from any address other than the server are discarded.

use proxyzone_dns_domain::DomainError;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }

    fn io_error(&self, e: io::Error) -> DomainError {
        let server = self.server_addr.to_string();
        match e.kind() {
            io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
            _ => DomainError::TransportError {
                server,
                reason: e.to_string(),
            },
        }
    }

    /// Sends one query and waits for the server's datagram.
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let timed_out = || DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        };

        let bytes_sent = tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| self.io_error(e))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = tokio::time::timeout(timeout, self.recv_from_server(&socket, &mut recv_buf))
            .await
            .map_err(|_| timed_out())??;

        recv_buf.truncate(bytes_received);

        debug!(server = %self.server_addr, bytes_received, "UDP response received");

        Ok(recv_buf)
    }

    async fn recv_from_server(
        &self,
        socket: &UdpSocket,
        buf: &mut [u8],
    ) -> Result<usize, DomainError> {
        loop {
            let (len, from) = socket
                .recv_from(buf)
                .await
                .map_err(|e| self.io_error(e))?;

            if from == self.server_addr {
                return Ok(len);
            }

            warn!(
                expected = %self.server_addr,
                received_from = %from,
                "UDP response from unexpected source, ignoring"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_transport_binds_matching_family() {
        let transport = UdpTransport::new("192.0.2.53:53".parse().unwrap());
        assert!(transport.bind_addr().is_ipv4());

        let transport = UdpTransport::new("[2001:db8::53]:53".parse().unwrap());
        assert!(transport.bind_addr().is_ipv6());
    }

    #[test]
    fn test_refused_maps_to_transport_error() {
        let transport = UdpTransport::new("127.0.0.1:53".parse().unwrap());
        let err = transport.io_error(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(matches!(err, DomainError::TransportConnectionRefused { .. }));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::new(silent.local_addr().unwrap());

        let err = transport
            .send(&[0u8; 12], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TransportTimeout { .. }));
    }
}
