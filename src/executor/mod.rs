//! Remote execution of queries
//!
//! This module is the boundary to the service:
//! - `RemoteExecutor`: the contract the pager depends on
//! - `HttpExecutor`: the reqwest-backed implementation
//! - `ServiceError`: transport and service failures, surfaced unchanged

mod http;
mod traits;

pub use http::{build_http_client, HttpExecutor};
pub use traits::{PageRequest, RemoteExecutor, ServiceError};
