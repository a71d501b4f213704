//! JSON-over-HTTP and MessagePack-over-HTTP backend clients.
//!
//! Both encodings share the same request shape, `GET {base}/{collection}/{key}`,
//! and differ only in the `Accept` header and the decoder applied to the body.

use crate::config::{Backends, PoolConfig};
use crate::errors::{BffError, FetchError};
use crate::fetch::{FetchClient, Lookup, ResourceKind};
use crate::records::Record;
use async_trait::async_trait;
use hyper::body::Bytes;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::time::Duration;
use url::Url;

/// Body decoding for one HTTP wire encoding.
pub trait WireFormat: Send + Sync + 'static {
    const NAME: &'static str;
    const ACCEPT: &'static str;

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError>;
}

pub struct Json;

impl WireFormat for Json {
    const NAME: &'static str = "json";
    const ACCEPT: &'static str = "application/json";

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
        serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

pub struct MessagePack;

impl WireFormat for MessagePack {
    const NAME: &'static str = "msgpack";
    const ACCEPT: &'static str = "application/x-msgpack";

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
        rmp_serde::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

pub type JsonFetchClient = HttpFetchClient<Json>;
pub type MessagePackFetchClient = HttpFetchClient<MessagePack>;

pub struct HttpFetchClient<W> {
    client: reqwest::Client,
    backends: Backends,
    _format: PhantomData<fn() -> W>,
}

impl<W: WireFormat> HttpFetchClient<W> {
    /// Builds the process-wide client. `timeout` bounds each round trip.
    pub fn new(backends: Backends, pool: &PoolConfig, timeout: Duration) -> Result<Self, BffError> {
        for kind in [
            ResourceKind::Product,
            ResourceKind::Seller,
            ResourceKind::Brand,
            ResourceKind::Category,
            ResourceKind::Image,
        ] {
            let url = backends.url_for(kind);
            if url.cannot_be_a_base() {
                return Err(BffError::InvalidBackendUrl(url.to_string()));
            }
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(pool.max_idle_per_host)
            .pool_idle_timeout(pool.idle_timeout())
            .build()?;

        Ok(Self {
            client,
            backends,
            _format: PhantomData,
        })
    }

    fn url(&self, lookup: &Lookup) -> Url {
        let mut url = self.backends.url_for(lookup.kind()).clone();
        // Checked in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(lookup.kind().as_str())
                .push(&lookup.key());
        }
        url
    }

    async fn get(&self, lookup: &Lookup) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(self.url(lookup))
            .header(ACCEPT, W::ACCEPT)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.bytes().await?),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            status => Err(FetchError::UnexpectedStatus(status.as_u16())),
        }
    }
}

#[async_trait]
impl<W: WireFormat> FetchClient for HttpFetchClient<W> {
    fn name(&self) -> &'static str {
        W::NAME
    }

    async fn fetch(&self, lookup: &Lookup) -> Result<Record, FetchError> {
        let body = self.get(lookup).await?;

        let record = match lookup.kind() {
            ResourceKind::Product => Record::Product(W::decode(&body)?),
            ResourceKind::Seller => Record::Seller(W::decode(&body)?),
            ResourceKind::Brand => Record::Brand(W::decode(&body)?),
            ResourceKind::Category => Record::Category(W::decode(&body)?),
            ResourceKind::Image => Record::Image(W::decode(&body)?),
        };
        Ok(record)
    }
}
