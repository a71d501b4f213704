use crate::fetch::ResourceKind;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Fetch timeout cannot be 0")]
    ZeroFetchTimeout,

    #[error("Connection pool needs at least one idle connection per host")]
    ZeroPoolSize,

    #[error("Backend URL for {0} must use http or https")]
    UnsupportedScheme(ResourceKind),
}

/// Wire encoding used to talk to the backend lookup services
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Json,
    Msgpack,
    Grpc,
}

/// BFF configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener serving the aggregation endpoints
    pub listener: Listener,
    /// Admin listener for health and readiness probes
    pub admin_listener: Listener,
    pub encoding: Encoding,
    /// Ceiling for every single backend call, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub pool: PoolConfig,
    pub backends: Backends,
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Validates the BFF configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.fetch_timeout_secs == 0 {
            return Err(ValidationError::ZeroFetchTimeout);
        }

        if self.pool.max_idle_per_host == 0 {
            return Err(ValidationError::ZeroPoolSize);
        }

        self.backends.validate()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Keep-alive pool shared by every backend call
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoolConfig {
    pub max_idle_per_host: usize,
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            max_idle_per_host: 100,
            idle_timeout_secs: 90,
        }
    }
}

impl PoolConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Base URL of the lookup service for each resource kind
///
/// Note: Uses the `url::Url` type so malformed URLs are rejected while the
/// config is deserialized.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Backends {
    pub products: Url,
    pub sellers: Url,
    pub brands: Url,
    pub categories: Url,
    pub images: Url,
}

impl Backends {
    pub fn url_for(&self, kind: ResourceKind) -> &Url {
        match kind {
            ResourceKind::Product => &self.products,
            ResourceKind::Seller => &self.sellers,
            ResourceKind::Brand => &self.brands,
            ResourceKind::Category => &self.categories,
            ResourceKind::Image => &self.images,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for kind in [
            ResourceKind::Product,
            ResourceKind::Seller,
            ResourceKind::Brand,
            ResourceKind::Category,
            ResourceKind::Image,
        ] {
            if !matches!(self.url_for(kind).scheme(), "http" | "https") {
                return Err(ValidationError::UnsupportedScheme(kind));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_YAML: &str = r#"
listener:
    host: "0.0.0.0"
    port: 8080
admin_listener:
    host: "127.0.0.1"
    port: 8081
encoding: msgpack
backends:
    products: "http://products-api:8080"
    sellers: "http://sellers-api:8080"
    brands: "http://brands-api:8080"
    categories: "http://categories-api:8080"
    images: "http://images-api:8080"
"#;

    #[test]
    fn test_parse_valid_config() {
        let config: Config = serde_yaml::from_str(VALID_YAML).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.encoding, Encoding::Msgpack);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.pool, PoolConfig::default());
        assert_eq!(
            config.backends.url_for(ResourceKind::Brand).as_str(),
            "http://brands-api:8080/"
        );
    }

    #[test]
    fn test_validation_errors() {
        let base_config: Config = serde_yaml::from_str(VALID_YAML).unwrap();

        let mut config = base_config.clone();
        config.admin_listener.port = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));

        let mut config = base_config.clone();
        config.fetch_timeout_secs = 0;
        assert_eq!(config.validate(), Err(ValidationError::ZeroFetchTimeout));

        let mut config = base_config.clone();
        config.pool.max_idle_per_host = 0;
        assert_eq!(config.validate(), Err(ValidationError::ZeroPoolSize));

        let mut config = base_config;
        config.backends.images = Url::parse("ftp://images-api").unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnsupportedScheme(ResourceKind::Image))
        );
    }

    #[test]
    fn test_deserialization_errors() {
        // Invalid URL
        assert!(
            serde_yaml::from_str::<Config>(&VALID_YAML.replace(
                "http://sellers-api:8080",
                "not-a-url"
            ))
            .is_err()
        );

        // Unknown encoding
        assert!(serde_yaml::from_str::<Encoding>("protobuf").is_err());

        // Missing backends
        assert!(
            serde_yaml::from_str::<Config>(
                r#"
listener: {host: "0.0.0.0", port: 8080}
admin_listener: {host: "127.0.0.1", port: 8081}
encoding: json
"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_enum_deserialization() {
        assert_eq!(
            serde_yaml::from_str::<Encoding>("json").unwrap(),
            Encoding::Json
        );
        assert_eq!(
            serde_yaml::from_str::<Encoding>("msgpack").unwrap(),
            Encoding::Msgpack
        );
        assert_eq!(
            serde_yaml::from_str::<Encoding>("grpc").unwrap(),
            Encoding::Grpc
        );
    }
}
