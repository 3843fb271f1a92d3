mod system_resolver;
mod upstream_client;
mod zone_store;

pub use system_resolver::SystemResolver;
pub use upstream_client::UpstreamClient;
pub use zone_store::ZoneStore;
