//! Runtime configuration, loaded from an optional `config.yaml` plus
//! `GATEWAY_`-prefixed environment variables.

use serde::Deserialize;
use std::time::Duration;

use crate::domain::types::ErpBaseUrl;

/// Connection settings for the ERP JSON-RPC endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErpConfig {
    pub base_url: ErpBaseUrl,
    pub api_key: String,
}

/// Cache time-to-live per resource family, in seconds.
///
/// Values are tuning parameters; the defaults mirror production behavior
/// (volatile product listings expire well before category and ribbon
/// metadata).
#[derive(Debug, Clone, Deserialize)]
pub struct CacheTtlConfig {
    #[serde(default = "default_products_ttl_secs")]
    pub products_secs: u64,
    #[serde(default = "default_categories_ttl_secs")]
    pub categories_secs: u64,
    #[serde(default = "default_ribbons_ttl_secs")]
    pub ribbons_secs: u64,
}

fn default_products_ttl_secs() -> u64 {
    5 * 60
}

fn default_categories_ttl_secs() -> u64 {
    30 * 60
}

fn default_ribbons_ttl_secs() -> u64 {
    60 * 60
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            products_secs: default_products_ttl_secs(),
            categories_secs: default_categories_ttl_secs(),
            ribbons_secs: default_ribbons_ttl_secs(),
        }
    }
}

impl CacheTtlConfig {
    pub fn products(&self) -> Duration {
        Duration::from_secs(self.products_secs)
    }

    pub fn categories(&self) -> Duration {
        Duration::from_secs(self.categories_secs)
    }

    pub fn ribbons(&self) -> Duration {
        Duration::from_secs(self.ribbons_secs)
    }
}

/// Top-level configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub erp: ErpConfig,
    #[serde(default)]
    pub cache: CacheTtlConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

impl ServerConfig {
    /// Loads configuration from `config.yaml` (optional) with environment
    /// overrides such as `GATEWAY_ERP__BASE_URL` and `GATEWAY_ERP__API_KEY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("GATEWAY").separator("__"))
            .build()?;

        let parsed: Self = settings.try_deserialize()?;

        // Expected TTL ordering: products expire before categories, which
        // expire before ribbons.
        if parsed.cache.products_secs > parsed.cache.categories_secs
            || parsed.cache.categories_secs > parsed.cache.ribbons_secs
        {
            log::warn!(
                "cache TTLs not in products <= categories <= ribbons order: {}/{}/{}s",
                parsed.cache.products_secs,
                parsed.cache.categories_secs,
                parsed.cache.ribbons_secs
            );
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_keep_relative_ordering() {
        let ttls = CacheTtlConfig::default();
        assert!(ttls.products() < ttls.categories());
        assert!(ttls.categories() < ttls.ribbons());
    }
}
