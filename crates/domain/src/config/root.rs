use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::server::ServerConfig;
use super::zones::ZonesConfig;

/// Main configuration structure for proxyzone-dns
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// TTL stamped on every record built from `zones`.
    #[serde(default = "default_zones_ttl")]
    pub zones_ttl: u32,

    #[serde(default)]
    pub zones: ZonesConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. proxyzone-dns.toml in current directory
    /// 3. /etc/proxyzone-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(api) = overrides.reload_api {
            self.server.reload_api = api;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.resolver.upstream_port == 0 {
            return Err(ConfigError::Validation(
                "Upstream port cannot be 0".to_string(),
            ));
        }

        if self.resolver.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "Query timeout must be at least 1 second".to_string(),
            ));
        }

        self.zones.check_proxied_hosts()
    }

    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("proxyzone-dns.toml").exists() {
            Some("proxyzone-dns.toml".to_string())
        } else if std::path::Path::new("/etc/proxyzone-dns/config.toml").exists() {
            Some("/etc/proxyzone-dns/config.toml".to_string())
        } else {
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            resolver: ResolverConfig::default(),
            logging: LoggingConfig::default(),
            zones_ttl: default_zones_ttl(),
            zones: ZonesConfig::default(),
        }
    }
}

fn default_zones_ttl() -> u32 {
    3600
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub reload_api: Option<String>,
    pub log_level: Option<String>,
}
