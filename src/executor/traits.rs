//! Executor trait and associated types

use crate::query::QuerySpec;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Transport and service errors
///
/// These are produced by executors and passed through the pager untouched.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Not authorized by {url}; check the api key")]
    Unauthorized { url: String },

    #[error("Rate limited by {url}")]
    RateLimited { url: String },

    #[error("Response from {url} is not valid JSON: {message}")]
    InvalidBody { url: String, message: String },

    #[error("Service reported an error: {0}")]
    Api(String),
}

/// Which page to fetch and how large it is
///
/// Pages are numbered from 1, as the service numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub count: u32,
}

impl PageRequest {
    pub fn new(page: u32, count: u32) -> Self {
        Self { page, count }
    }

    /// The cheapest request that still reports a total: page 1, one item
    pub fn probe() -> Self {
        Self::new(1, 1)
    }

    /// The page after this one, same size
    pub fn next(&self) -> Self {
        Self::new(self.page + 1, self.count)
    }
}

/// Executes one page of a query against the service
///
/// Implementations own authentication, retries and rate limiting; callers
/// see either the raw JSON response or a `ServiceError`.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Sends one page request and returns the parsed JSON body
    async fn execute(&self, spec: &QuerySpec, page: PageRequest) -> Result<Value, ServiceError>;
}
