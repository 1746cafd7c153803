//! Structural validation of returned records
//!
//! Records are treated as loosely-typed JSON; validators check presence and
//! basic types only. They are pure and compose: the event validator runs the
//! article validator over nested article lists.

mod order;
mod records;
mod shape;

pub use order::check_order;
pub use records::{ensure_valid_article, ensure_valid_event, ensure_valid_story};
pub use shape::{validate_event_entry, ExpectedShape, Section};

use thiserror::Error;

/// A record did not have the expected structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{context}: missing '{field}'")]
    Missing { context: String, field: String },

    #[error("{context}: '{field}' should be {expected}")]
    WrongType {
        context: String,
        field: String,
        expected: &'static str,
    },

    #[error("{context}: unexpected '{field}'")]
    Unexpected { context: String, field: String },

    #[error("{context}: items {index} and {next} are out of order on '{field}'")]
    OutOfOrder {
        context: String,
        field: String,
        index: usize,
        next: usize,
    },
}

/// Result type for validators
pub type ValidationResult = std::result::Result<(), ValidationError>;
