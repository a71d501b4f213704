use crate::config::Listener as ListenerConfig;
use crate::metrics_defs::LOOKUP;
use crate::store::{Catalog, Record};
use crate::types::{Brand, Category, Image, Product, Seller};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(thiserror::Error, Debug)]
pub enum CatalogApiError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("could not encode response: {0}")]
    Encode(String),
}

#[derive(Serialize)]
struct ApiErrorResponse {
    error_message: String,
}

impl IntoResponse for CatalogApiError {
    fn into_response(self) -> Response {
        let status = match self {
            CatalogApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogApiError::IoError(_) | CatalogApiError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ApiErrorResponse {
            error_message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Wire encoding selected from the request's `Accept` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Json,
    MessagePack,
}

impl Encoding {
    fn negotiate(headers: &HeaderMap) -> Self {
        let accepts_msgpack = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.contains(MSGPACK_CONTENT_TYPE));

        match accepts_msgpack {
            true => Encoding::MessagePack,
            false => Encoding::Json,
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            Encoding::Json => JSON_CONTENT_TYPE,
            Encoding::MessagePack => MSGPACK_CONTENT_TYPE,
        }
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CatalogApiError> {
        match self {
            Encoding::Json => {
                serde_json::to_vec(value).map_err(|e| CatalogApiError::Encode(e.to_string()))
            }
            // Named fields keep the payload a map, matching the JSON field names.
            Encoding::MessagePack => {
                rmp_serde::to_vec_named(value).map_err(|e| CatalogApiError::Encode(e.to_string()))
            }
        }
    }
}

struct Encoded<T> {
    encoding: Encoding,
    value: T,
}

impl<T: Serialize> IntoResponse for Encoded<T> {
    fn into_response(self) -> Response {
        match self.encoding.encode(&self.value) {
            Ok(bytes) => (
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(self.encoding.content_type()),
                )],
                bytes,
            )
                .into_response(),
            Err(e) => e.into_response(),
        }
    }
}

pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/products", get(list::<Product>))
        .route("/products/{slug}", get(product_by_slug))
        .route("/sellers", get(list::<Seller>))
        .route("/sellers/{id}", get(by_id::<Seller>))
        .route("/brands", get(list::<Brand>))
        .route("/brands/{id}", get(by_id::<Brand>))
        .route("/categories", get(list::<Category>))
        .route("/categories/{id}", get(by_id::<Category>))
        .route("/images", get(list::<Image>))
        .route("/images/{id}", get(by_id::<Image>))
        .with_state(catalog)
}

pub async fn serve(listener: ListenerConfig, catalog: Arc<Catalog>) -> Result<(), CatalogApiError> {
    let addr = format!("{}:{}", listener.host, listener.port);

    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, catalog).await
}

/// Serves the catalog on an already bound listener.
pub async fn serve_listener(listener: TcpListener, catalog: Arc<Catalog>) -> Result<(), CatalogApiError> {
    tracing::info!(addr = %listener.local_addr()?, "Catalog listening");
    axum::serve(listener, router(catalog)).await?;
    Ok(())
}

fn record_lookup(kind: &'static str, found: bool) {
    shared::counter!(LOOKUP, "kind" => kind, "found" => if found { "true" } else { "false" })
        .increment(1);
}

async fn list<T: Record>(
    State(catalog): State<Arc<Catalog>>,
    headers: HeaderMap,
) -> Encoded<Vec<T>> {
    Encoded {
        encoding: Encoding::negotiate(&headers),
        value: T::table(&catalog).iter().cloned().collect(),
    }
}

async fn by_id<T: Record>(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Encoded<T>, CatalogApiError> {
    let found = catalog.get::<T>(id).cloned();
    record_lookup(T::KIND, found.is_some());

    let value = found.ok_or_else(|| CatalogApiError::NotFound {
        kind: T::KIND,
        key: id.to_string(),
    })?;

    Ok(Encoded {
        encoding: Encoding::negotiate(&headers),
        value,
    })
}

async fn product_by_slug(
    State(catalog): State<Arc<Catalog>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Encoded<Product>, CatalogApiError> {
    let found = catalog.product_by_slug(&slug).cloned();
    record_lookup(Product::KIND, found.is_some());

    let value = found.ok_or(CatalogApiError::NotFound {
        kind: Product::KIND,
        key: slug,
    })?;

    Ok(Encoded {
        encoding: Encoding::negotiate(&headers),
        value,
    })
}
