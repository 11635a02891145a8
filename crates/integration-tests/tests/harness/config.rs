//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::Path;

use timbre_config::Config;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder bound to an ephemeral port
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        Self { config }
    }

    /// Point the voice library at a test directory
    pub fn with_voices_dir(mut self, dir: &Path) -> Self {
        self.config.voices.dir = dir.to_path_buf();
        self
    }

    /// Set the synthesis time budget in seconds
    pub fn with_synthesis_timeout(mut self, secs: u64) -> Self {
        self.config.server.synthesis_timeout_secs = secs;
        self
    }

    /// Set the maximum accepted request body size in bytes
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.config.server.body_limit_bytes = bytes;
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
