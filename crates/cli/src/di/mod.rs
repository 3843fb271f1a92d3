use proxyzone_dns_application::ports::{SystemResolver, ZoneStore};
use proxyzone_dns_application::use_cases::{
    HandleDnsQueryUseCase, ReloadZonesUseCase, ResolveProxyUseCase,
};
use proxyzone_dns_domain::{Config, ZoneSnapshot};
use proxyzone_dns_infrastructure::dns::{DnsServerHandler, UdpUpstreamClient};
use proxyzone_dns_infrastructure::system::{ResolvConfResolver, StaticResolver};
use proxyzone_dns_infrastructure::zones::ArcSwapZoneStore;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Services {
    pub handler: Arc<DnsServerHandler>,
    pub reload_zones: Arc<ReloadZonesUseCase>,
}

impl Services {
    pub fn new(config: &Config, config_path: Option<String>) -> anyhow::Result<Self> {
        let snapshot = ZoneSnapshot::from_config(config)?;
        info!(
            hosts = snapshot.store.len(),
            proxied_hosts = snapshot.store.proxied_len(),
            zones = snapshot.directory.zone_count(),
            "Initial zone snapshot built"
        );

        let zones: Arc<dyn ZoneStore> = Arc::new(ArcSwapZoneStore::new(snapshot));
        let upstream = Arc::new(UdpUpstreamClient::new(config.resolver.timeout()));
        let system = Self::build_system_resolver(config);

        let resolve_proxy = Arc::new(ResolveProxyUseCase::new(
            upstream,
            system,
            config.resolver.upstream_port,
        ));
        let handle_query = Arc::new(HandleDnsQueryUseCase::new(zones.clone(), resolve_proxy));

        Ok(Self {
            handler: Arc::new(DnsServerHandler::new(handle_query)),
            reload_zones: Arc::new(ReloadZonesUseCase::new(zones, config_path)),
        })
    }

    fn build_system_resolver(config: &Config) -> Arc<dyn SystemResolver> {
        if let Some(nameserver) = config.resolver.nameserver.as_deref() {
            match nameserver.parse::<IpAddr>() {
                Ok(ip) => {
                    info!(nameserver = %ip, "Using configured probe resolver");
                    return Arc::new(StaticResolver::new(ip));
                }
                Err(e) => {
                    warn!(nameserver, error = %e, "Invalid resolver.nameserver, falling back to resolv.conf");
                }
            }
        }

        info!(path = %config.resolver.resolv_conf, "Using probe resolver from resolv.conf");
        Arc::new(ResolvConfResolver::new(config.resolver.resolv_conf.clone()))
    }
}
