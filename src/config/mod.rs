//! Settings module for the Event Registry client
//!
//! This module handles loading, parsing, and validating TOML settings files.
//!
//! # Example
//!
//! ```no_run
//! use event_registry::config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("registry.toml")).unwrap();
//! println!("Service: {}", settings.service.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClientConfig, PagingConfig, ServiceConfig, Settings, MAX_PAGE_SIZE};

// Re-export parser functions
pub use parser::{compute_settings_hash, load_settings, load_settings_with_hash};
pub use validation::validate;
