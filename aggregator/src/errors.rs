use thiserror::Error;

/// Outcome of a single failed round trip to a backend lookup service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("record not found")]
    NotFound,

    #[error("backend call timed out")]
    Timeout,

    #[error("backend request failed: {0}")]
    Transport(String),

    #[error("backend answered with unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("could not decode backend payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Failures that abort a whole aggregation. Only the primary fetch can produce these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("no product with slug {0}")]
    NotFound(String),

    #[error("product lookup failed: {0}")]
    Upstream(#[from] FetchError),
}

/// Errors raised while starting or running the BFF process
#[derive(Error, Debug)]
pub enum BffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("gRPC endpoint error: {0}")]
    GrpcEndpoint(#[from] tonic::transport::Error),

    #[error("Backend URL cannot carry a path: {0}")]
    InvalidBackendUrl(String),
}
