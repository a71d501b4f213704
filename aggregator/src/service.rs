use crate::errors::BffError;
use crate::router::Router;
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response};
use shared::http::full_body;
use std::future::Future;
use std::pin::Pin;

/// Hyper service for the public listener
pub struct BffService {
    router: Router,
}

impl BffService {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

impl Service<Request<Incoming>> for BffService {
    type Response = Response<BoxBody<Bytes, BffError>>;
    type Error = BffError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let router = self.router.clone();
        Box::pin(async move { Ok(router.route(req).await.map(full_body)) })
    }
}
