//! Paginated query iteration
//!
//! This module turns a `QuerySpec` into a single logical sequence of items
//! spanning all result pages:
//! - `ResultPage`: one unwrapped service response
//! - `IterState`: the iteration state machine
//! - `PagedIterator`: drives an executor page by page and caches the total
//! - `PaginationInconsistency`: detected disagreements between pages

mod iterator;
mod page;
mod state;

pub use iterator::PagedIterator;
pub use page::ResultPage;
pub use state::IterState;

use thiserror::Error;

/// The service contradicted itself while paginating
///
/// Enumeration stops at the point of detection; items yielded before it
/// remain valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationInconsistency {
    #[error("total changed on page {page}: expected {expected}, service reported {reported}")]
    TotalChanged {
        page: u32,
        expected: u64,
        reported: u64,
    },

    #[error("page {page} is empty after {yielded} of {expected} items")]
    EmptyPage {
        page: u32,
        yielded: u64,
        expected: u64,
    },

    #[error("page {page} holds {received} items but only {remaining} of {expected} remain")]
    Overflow {
        page: u32,
        received: u64,
        remaining: u64,
        expected: u64,
    },

    #[error("service reports {pages} pages but only {yielded} of {expected} items were returned")]
    PrematureEnd {
        pages: u32,
        yielded: u64,
        expected: u64,
    },
}
