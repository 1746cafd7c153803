//! Event Registry client: query building, paginated article iteration and
//! response validation
//!
//! This crate talks to a remote news/event registry service. Queries are
//! described by immutable [`QuerySpec`] values, sent through a
//! [`RemoteExecutor`], and enumerated page by page with a [`PagedIterator`].
//! The [`validate`] module asserts the structure of returned records.

pub mod config;
pub mod executor;
pub mod pager;
pub mod query;
pub mod validate;

use thiserror::Error;

/// Main error type for Event Registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Service error: {0}")]
    Service(#[from] executor::ServiceError),

    #[error("Malformed response ({context}): {message}")]
    MalformedResponse { context: String, message: String },

    #[error("Pagination inconsistency: {0}")]
    PaginationInconsistency(#[from] pager::PaginationInconsistency),

    #[error("Event {uri} was merged into {new_uri}")]
    EventMerged { uri: String, new_uri: String },

    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    /// Builds a `MalformedResponse` error
    pub(crate) fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Settings-file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in settings: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Event Registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Result type alias for settings operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Settings;
pub use executor::{HttpExecutor, PageRequest, RemoteExecutor, ServiceError};
pub use pager::{IterState, PagedIterator, PaginationInconsistency, ResultPage};
pub use query::{QuerySpec, ResultShape, ReturnInfo, SortBy, SortDirection};
