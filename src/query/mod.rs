//! Query descriptions and request payload building
//!
//! This module turns structured query parameters into the JSON bodies the
//! service expects:
//! - `QuerySpec`: the filter/sort/shape description driving a paged article query
//! - `EventQuery`: detail requests against one or more known events
//! - `EventSearch`: event lookup by filters, returning weighted URIs
//! - Sort and return-info descriptors shared by all of the above

mod event;
mod return_info;
mod sort;
mod spec;

pub use event::{EventEntry, EventQuery, EventRequest, EventResults, EventSearch, WeightedConcept};
pub use return_info::{ArticleInfoFlags, EventInfoFlags, ReturnInfo};
pub use sort::{SortBy, SortDirection};
pub use spec::{QuerySpec, QuerySpecBuilder, ResultShape};

/// Event detail endpoint (event-scoped queries)
pub const EVENT_ENDPOINT: &str = "/api/v1/event/getEvent";

/// Article search endpoint (queries without a target event)
pub const ARTICLES_ENDPOINT: &str = "/api/v1/article/getArticles";

/// Event search endpoint
pub const EVENTS_ENDPOINT: &str = "/api/v1/event/getEvents";

/// Concept label lookup endpoint
pub const SUGGEST_CONCEPTS_ENDPOINT: &str = "/api/v1/suggestConceptsFast";

/// News source lookup endpoint
pub const SUGGEST_SOURCES_ENDPOINT: &str = "/api/v1/suggestSourcesFast";

/// Extracts the URI from a `"uri:wgt"` entry of a `uriWgtList`
///
/// The weight is the part after the last colon; entries without a colon are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use event_registry::query::uri_from_uri_wgt;
///
/// assert_eq!(uri_from_uri_wgt("eng-2860795:42"), "eng-2860795");
/// assert_eq!(uri_from_uri_wgt("eng-2860795"), "eng-2860795");
/// ```
pub fn uri_from_uri_wgt(entry: &str) -> &str {
    match entry.rsplit_once(':') {
        Some((uri, wgt)) if wgt.chars().all(|c| c.is_ascii_digit()) && !wgt.is_empty() => uri,
        _ => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_from_uri_wgt() {
        assert_eq!(uri_from_uri_wgt("1234567:88"), "1234567");
        assert_eq!(uri_from_uri_wgt("eng-1:0"), "eng-1");
        assert_eq!(uri_from_uri_wgt("eng-1"), "eng-1");
        // a colon inside the uri that isn't followed by a weight
        assert_eq!(
            uri_from_uri_wgt("http://en.wikipedia.org/wiki/X"),
            "http://en.wikipedia.org/wiki/X"
        );
    }
}
