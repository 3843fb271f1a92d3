pub mod codec;
pub mod server;
pub mod transport;
pub mod upstream;

pub use server::DnsServerHandler;
pub use upstream::UdpUpstreamClient;
