//! Interchangeable backend transports behind [`FetchClient`].

pub mod grpc;
pub mod http;
mod proto;

use crate::config::{Config, Encoding};
use crate::errors::BffError;
use crate::fetch::FetchClient;
use std::sync::Arc;

pub use self::grpc::GrpcFetchClient;
pub use self::http::{HttpFetchClient, JsonFetchClient, MessagePackFetchClient};

/// Builds the process-wide backend client for the configured encoding.
pub fn build_client(config: &Config) -> Result<Arc<dyn FetchClient>, BffError> {
    let timeout = config.fetch_timeout();
    let backends = config.backends.clone();

    let client: Arc<dyn FetchClient> = match config.encoding {
        Encoding::Json => Arc::new(JsonFetchClient::new(backends, &config.pool, timeout)?),
        Encoding::Msgpack => Arc::new(MessagePackFetchClient::new(
            backends,
            &config.pool,
            timeout,
        )?),
        Encoding::Grpc => Arc::new(GrpcFetchClient::new(&backends, &config.pool, timeout)?),
    };
    Ok(client)
}
