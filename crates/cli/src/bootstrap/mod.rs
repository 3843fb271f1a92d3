use proxyzone_dns_domain::{CliOverrides, Config};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over `logging.level`.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    info!(level = %config.logging.level, "Logging initialized");
}

pub fn log_config_summary(config: &Config) {
    info!(
        dns = %config.server.dns_listen_addr(),
        reload_api = %config.server.reload_api,
        upstream_port = config.resolver.upstream_port,
        query_timeout = config.resolver.query_timeout,
        hosts = config.zones.host_count(),
        "Configuration loaded"
    );
}
