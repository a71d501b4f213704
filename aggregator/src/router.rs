use crate::errors::AggregateError;
use crate::metrics_defs::{REQUEST_DURATION, REQUESTS_INFLIGHT};
use crate::orchestrator::{Aggregator, Strategy};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use metrics::Gauge;
use percent_encoding::percent_decode_str;
use shared::http::{make_error_response, make_json_response};
use std::sync::Arc;
use std::time::Instant;

const SEQUENTIAL_PREFIX: &str = "/sequencial/";
const PARALLEL_PREFIX: &str = "/paralelo/";

/// Matches aggregation endpoints and turns their outcome into HTTP responses
#[derive(Clone)]
pub struct Router {
    aggregator: Arc<Aggregator>,
}

impl Router {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self { aggregator }
    }

    /// Routes an incoming request to the matching strategy
    pub async fn route<B>(&self, req: Request<B>) -> Response<Bytes> {
        let matched = find_matching_route(req.method(), req.uri().path()).and_then(
            |(strategy, raw_slug)| {
                decode_slug(raw_slug)
                    .map(|slug| (strategy, slug))
                    .ok_or(StatusCode::NOT_FOUND)
            },
        );

        match matched {
            Ok((strategy, slug)) => {
                tracing::debug!(strategy = strategy.as_str(), slug = %slug, "Matched route");
                self.handle_aggregate(&slug, strategy).await
            }
            Err(status) => {
                tracing::warn!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    "No route matched"
                );
                make_error_response(status)
            }
        }
    }

    async fn handle_aggregate(&self, slug: &str, strategy: Strategy) -> Response<Bytes> {
        let _inflight = InflightGuard::new(shared::gauge!(REQUESTS_INFLIGHT));
        let start = Instant::now();

        let response = match self.aggregator.aggregate(slug, strategy).await {
            Ok(composite) => match composite.to_json() {
                Ok(body) => make_json_response(body),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize composite");
                    make_error_response(StatusCode::INTERNAL_SERVER_ERROR)
                }
            },
            Err(AggregateError::NotFound(_)) => make_error_response(StatusCode::NOT_FOUND),
            Err(AggregateError::Upstream(_)) => {
                make_error_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        shared::histogram!(
            REQUEST_DURATION,
            "strategy" => strategy.as_str(),
            "status" => response.status().as_str().to_owned()
        )
        .record(start.elapsed().as_secs_f64());

        response
    }
}

/// Holds the in-flight gauge up for as long as a request is being handled.
///
/// Released on drop, so requests abandoned by their client are accounted for too.
struct InflightGuard {
    gauge: Gauge,
}

impl InflightGuard {
    fn new(gauge: Gauge) -> Self {
        gauge.increment(1.0);
        Self { gauge }
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.gauge.decrement(1.0);
    }
}

/// Resolves `GET /sequencial/{slug}` and `GET /paralelo/{slug}`.
///
/// The slug must be a single non-empty path segment. It is returned still
/// percent-encoded.
fn find_matching_route<'a>(
    method: &Method,
    path: &'a str,
) -> Result<(Strategy, &'a str), StatusCode> {
    let (strategy, slug) = if let Some(slug) = path.strip_prefix(SEQUENTIAL_PREFIX) {
        (Strategy::Sequential, slug)
    } else if let Some(slug) = path.strip_prefix(PARALLEL_PREFIX) {
        (Strategy::Parallel, slug)
    } else {
        return Err(StatusCode::NOT_FOUND);
    };

    if slug.is_empty() || slug.contains('/') {
        return Err(StatusCode::NOT_FOUND);
    }

    if method != Method::GET {
        return Err(StatusCode::METHOD_NOT_ALLOWED);
    }

    Ok((strategy, slug))
}

/// Percent-decodes a slug path segment. `None` when it does not decode to UTF-8.
fn decode_slug(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|slug| slug.into_owned())
}
