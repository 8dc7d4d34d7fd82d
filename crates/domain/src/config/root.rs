use serde::{Deserialize, Serialize};
use std::path::Path;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::upstream::UpstreamEndpoint;
use crate::wire::HEADER_LEN;

const LOCAL_CONFIG_PATH: &str = "dnsrelay.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dnsrelay/config.toml";

/// Main configuration structure for the relay
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address, buffer sizes)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolvers queries are forwarded to
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsrelay.toml in current directory
    /// 3. /etc/dnsrelay/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.or_else(|| Self::discover_config_path()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn discover_config_path() -> Option<&'static str> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|candidate| Path::new(candidate).exists())
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if !overrides.upstream_servers.is_empty() {
            self.upstream.servers = overrides.upstream_servers;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.disable_cache {
            self.cache.enabled = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.max_datagram_size < HEADER_LEN {
            return Err(ConfigError::Validation(format!(
                "max_datagram_size must be at least {} bytes",
                HEADER_LEN
            )));
        }

        if self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        self.upstream_endpoints()?;

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache.max_entries must be greater than 0 when the cache is enabled".to_string(),
            ));
        }

        if self.cache.min_ttl > self.cache.max_ttl {
            return Err(ConfigError::Validation(format!(
                "cache.min_ttl ({}) is greater than cache.max_ttl ({})",
                self.cache.min_ttl, self.cache.max_ttl
            )));
        }

        if !(0.0..=1.0).contains(&self.cache.batch_eviction_percentage) {
            return Err(ConfigError::Validation(
                "cache.batch_eviction_percentage must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn upstream_endpoints(&self) -> Result<Vec<UpstreamEndpoint>, ConfigError> {
        self.upstream
            .servers
            .iter()
            .map(|s| s.parse::<UpstreamEndpoint>().map_err(ConfigError::Validation))
            .collect()
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream_servers: Vec<String>,
    pub log_level: Option<String>,
    pub disable_cache: bool,
}
