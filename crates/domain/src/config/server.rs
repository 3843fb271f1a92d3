use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Address of the HTTP reload endpoint.
    #[serde(default = "default_reload_api")]
    pub reload_api: String,
}

impl ServerConfig {
    pub fn dns_listen_addr(&self) -> String {
        if self.bind_address.contains(':') {
            format!("[{}]:{}", self.bind_address, self.dns_port)
        } else {
            format!("{}:{}", self.bind_address, self.dns_port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            bind_address: default_bind_address(),
            reload_api: default_reload_api(),
        }
    }
}

fn default_dns_port() -> u16 {
    8053
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_reload_api() -> String {
    "127.0.0.1:8054".to_string()
}
