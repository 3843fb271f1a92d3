use proxyzone_dns_infrastructure::dns::DnsServerHandler;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

const RECV_BUFFER_SIZE: usize = 4096;

/// Serves UDP queries until `shutdown` fires, then waits for in-flight
/// chains to finish.
pub async fn start_dns_server(
    bind_addr: String,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = Arc::new(UdpSocket::bind(socket_addr).await?);

    info!(bind_address = %socket_addr, "DNS server listening on UDP");

    let tracker = TaskTracker::new();
    let mut recv_buf = vec![0u8; RECV_BUFFER_SIZE];

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("DNS server: shutting down");
                break;
            }
            received = socket.recv_from(&mut recv_buf) => {
                let (len, client) = match received {
                    Ok(received) => received,
                    Err(e) => {
                        warn!(error = %e, "UDP receive error");
                        continue;
                    }
                };

                let query = recv_buf[..len].to_vec();
                let handler = handler.clone();
                let socket = socket.clone();

                tracker.spawn(async move {
                    let Some(response) = handler.handle_raw_udp(&query, client).await else {
                        return;
                    };
                    match socket.send_to(&response, client).await {
                        Ok(sent) => debug!(client = %client, bytes = sent, "Response sent"),
                        Err(e) => error!(client = %client, error = %e, "Failed to send response"),
                    }
                });
            }
        }
    }

    tracker.close();
    info!(in_flight = tracker.len(), "Waiting for in-flight queries");
    tracker.wait().await;

    info!("DNS server stopped");
    Ok(())
}
