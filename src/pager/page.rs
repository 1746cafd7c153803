//! One page of results, unwrapped from a raw service response

use crate::executor::PageRequest;
use crate::query::QuerySpec;
use crate::{RegistryError, Result};
use serde_json::Value;

/// One page of results
///
/// Built only from a service response. The total is the size of the whole
/// result set, not of this page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    items: Vec<Value>,
    total: u64,
    page: u32,
    pages: Option<u32>,
}

impl ResultPage {
    /// Unwraps a page from the service response to `request`
    ///
    /// Event-scoped responses are keyed by the event URI; article search
    /// responses carry the section at the root. The section (`articles` or
    /// `uriWgtList`) must hold a `results` array and a `totalResults` count.
    ///
    /// # Errors
    ///
    /// * `RegistryError::EventMerged` - the event was merged into another one
    /// * `RegistryError::MalformedResponse` - a required key is missing or mistyped
    pub fn from_response(spec: &QuerySpec, request: PageRequest, mut response: Value) -> Result<Self> {
        let context = format!("{} page {}", spec.describe(), request.page);

        let root = match spec.event_uri() {
            Some(uri) => {
                let entry = response.get_mut(uri).ok_or_else(|| {
                    RegistryError::malformed(&context, format!("no entry for event {}", uri))
                })?;
                if let Some(new_uri) = entry.get("newEventUri").and_then(Value::as_str) {
                    return Err(RegistryError::EventMerged {
                        uri: uri.to_string(),
                        new_uri: new_uri.to_string(),
                    });
                }
                entry
            }
            None => &mut response,
        };

        let key = spec.shape().section_key();
        let section = root
            .get_mut(key)
            .ok_or_else(|| RegistryError::malformed(&context, format!("missing '{}' section", key)))?;

        let total = section
            .get("totalResults")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                RegistryError::malformed(&context, "missing or invalid 'totalResults'")
            })?;

        let pages = section
            .get("pages")
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok());

        let page = section
            .get("page")
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(request.page);

        let items = match section.get_mut("results").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(RegistryError::malformed(
                    &context,
                    "missing or invalid 'results' array",
                ))
            }
        };

        Ok(Self {
            items,
            total,
            page,
            pages,
        })
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total result count for the whole query
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Page number as reported by the service, or as requested
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page count, when the service reports one
    pub fn pages(&self) -> Option<u32> {
        self.pages
    }

    /// Whether another page should be requested
    ///
    /// `yielded` is the cumulative item count including this page. An
    /// explicit page count from the service ends pagination even if the
    /// total has not been reached.
    pub fn has_more(&self, yielded: u64) -> bool {
        if yielded >= self.total {
            return false;
        }
        match self.pages {
            Some(pages) => self.page < pages,
            None => true,
        }
    }
}
