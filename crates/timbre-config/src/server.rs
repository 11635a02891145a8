use std::net::SocketAddr;

use serde::Deserialize;

use crate::health::HealthConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Wall-clock budget for a single synthesis request, in seconds
    #[serde(default = "default_synthesis_timeout_secs")]
    pub synthesis_timeout_secs: u64,
    /// Maximum accepted JSON body size, in bytes
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
    #[serde(default)]
    pub health: HealthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            synthesis_timeout_secs: default_synthesis_timeout_secs(),
            body_limit_bytes: default_body_limit_bytes(),
            health: HealthConfig::default(),
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

const fn default_synthesis_timeout_secs() -> u64 {
    300
}

const fn default_body_limit_bytes() -> usize {
    32 * 1024 * 1024
}
