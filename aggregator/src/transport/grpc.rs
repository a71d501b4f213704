//! Schema-typed binary RPC backend client.
//!
//! One lazily connected tonic channel per lookup service. Channels multiplex
//! calls over HTTP/2, so cloning a client per call shares the connection.

use super::proto;
use crate::config::{Backends, PoolConfig};
use crate::errors::{BffError, FetchError};
use crate::fetch::{FetchClient, Lookup};
use crate::records::Record;
use async_trait::async_trait;
use http::uri::PathAndQuery;
use std::time::Duration;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use url::Url;

const GET_PRODUCT_BY_SLUG: &str = "/product.ProductService/GetProductBySlug";
const GET_SELLER_BY_ID: &str = "/seller.SellerService/GetSellerByID";
const GET_BRAND_BY_ID: &str = "/brand.BrandService/GetBrandByID";
const GET_CATEGORY_BY_ID: &str = "/category.CategoryService/GetCategoryByID";
const GET_IMAGE_BY_ID: &str = "/image.ImageService/GetImageByID";

impl From<Status> for FetchError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::NotFound => FetchError::NotFound,
            Code::Unknown if reports_missing_record(status.message()) => FetchError::NotFound,
            Code::DeadlineExceeded => FetchError::Timeout,
            _ => FetchError::Transport(format!("{:?}: {}", status.code(), status.message())),
        }
    }
}

/// The lookup services answer a miss with a plain error, which reaches us as
/// `Code::Unknown` carrying e.g. "product não encontrado" or "marca não encontrada".
fn reports_missing_record(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("não encontrad") || message.contains("not found")
}

pub struct GrpcFetchClient {
    products: Grpc<Channel>,
    sellers: Grpc<Channel>,
    brands: Grpc<Channel>,
    categories: Grpc<Channel>,
    images: Grpc<Channel>,
}

impl GrpcFetchClient {
    /// Sets up every channel without connecting. Must run inside a tokio runtime.
    pub fn new(backends: &Backends, pool: &PoolConfig, timeout: Duration) -> Result<Self, BffError> {
        let connect = |url: &Url| -> Result<Grpc<Channel>, BffError> {
            let endpoint = Endpoint::from_shared(url.to_string())?
                .timeout(timeout)
                .connect_timeout(timeout)
                .tcp_keepalive(Some(pool.idle_timeout()));
            Ok(Grpc::new(endpoint.connect_lazy()))
        };

        Ok(Self {
            products: connect(&backends.products)?,
            sellers: connect(&backends.sellers)?,
            brands: connect(&backends.brands)?,
            categories: connect(&backends.categories)?,
            images: connect(&backends.images)?,
        })
    }

    async fn unary<Req, Resp>(
        client: &Grpc<Channel>,
        path: &'static str,
        request: Req,
    ) -> Result<Resp, FetchError>
    where
        Req: prost::Message + 'static,
        Resp: prost::Message + Default + 'static,
    {
        let mut client = client.clone();
        client
            .ready()
            .await
            .map_err(|e| FetchError::Transport(format!("service was not ready: {e}")))?;

        let codec = ProstCodec::<Req, Resp>::default();
        let response = client
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(path),
                codec,
            )
            .await?;
        Ok(response.into_inner())
    }
}

/// Backends store ids as int32; anything wider cannot exist there.
fn resource_id(id: i64) -> Result<proto::ResourceId, FetchError> {
    i32::try_from(id)
        .map(|id| proto::ResourceId { id })
        .map_err(|_| FetchError::NotFound)
}

#[async_trait]
impl FetchClient for GrpcFetchClient {
    fn name(&self) -> &'static str {
        "grpc"
    }

    async fn fetch(&self, lookup: &Lookup) -> Result<Record, FetchError> {
        let record = match lookup {
            Lookup::ProductBySlug(slug) => {
                let request = proto::Slug { slug: slug.clone() };
                let product: proto::Product =
                    Self::unary(&self.products, GET_PRODUCT_BY_SLUG, request).await?;
                Record::Product(product.into())
            }
            Lookup::Seller(id) => {
                let seller: proto::Seller =
                    Self::unary(&self.sellers, GET_SELLER_BY_ID, resource_id(*id)?).await?;
                Record::Seller(seller.into())
            }
            Lookup::Brand(id) => {
                let brand: proto::Brand =
                    Self::unary(&self.brands, GET_BRAND_BY_ID, resource_id(*id)?).await?;
                Record::Brand(brand.into())
            }
            Lookup::Category(id) => {
                let category: proto::Category =
                    Self::unary(&self.categories, GET_CATEGORY_BY_ID, resource_id(*id)?).await?;
                Record::Category(category.into())
            }
            Lookup::Image(id) => {
                let image: proto::Image =
                    Self::unary(&self.images, GET_IMAGE_BY_ID, resource_id(*id)?).await?;
                Record::Image(image.into())
            }
        };
        Ok(record)
    }
}
