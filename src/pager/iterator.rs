//! Paged iterator - drives an executor across result pages
//!
//! The iterator borrows its `QuerySpec` and owns only its cursor: the next
//! page to request, the cached total, the buffered items of the current page
//! and the count of items handed out so far. Pages are fetched strictly one
//! after another, and only when their items are needed.

use crate::config::MAX_PAGE_SIZE;
use crate::executor::{PageRequest, RemoteExecutor};
use crate::pager::{IterState, PaginationInconsistency, ResultPage};
use crate::query::QuerySpec;
use crate::{RegistryError, Result};
use futures::stream::{self, BoxStream};
use serde_json::Value;

/// Lazy, single-pass enumeration of all items of a query
///
/// # Example
///
/// ```no_run
/// use event_registry::{HttpExecutor, PagedIterator, QuerySpec, Settings};
///
/// # async fn run() -> event_registry::Result<()> {
/// let executor = HttpExecutor::new(&Settings::default())?;
/// let spec = QuerySpec::for_event("eng-2866653").build()?;
///
/// let mut iter = PagedIterator::new(&spec);
/// let total = iter.count(&executor).await?;
/// let mut seen = 0;
/// while let Some(article) = iter.next(&executor).await {
///     let _article = article?;
///     seen += 1;
/// }
/// iter.ensure_consistent()?;
/// assert_eq!(seen, total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PagedIterator<'q> {
    spec: &'q QuerySpec,
    state: IterState,
    next_page: PageRequest,
    total: Option<u64>,
    buffer: std::vec::IntoIter<Value>,
    more_pages: bool,
    yielded: u64,
    pages_fetched: u32,
    inconsistency: Option<PaginationInconsistency>,
}

impl<'q> PagedIterator<'q> {
    /// Creates an iterator using the query's page size, or the service maximum
    pub fn new(spec: &'q QuerySpec) -> Self {
        let page_size = spec.page_size().unwrap_or(MAX_PAGE_SIZE);
        Self {
            spec,
            state: IterState::NotStarted,
            next_page: PageRequest::new(1, page_size),
            total: None,
            buffer: Vec::new().into_iter(),
            more_pages: true,
            yielded: 0,
            pages_fetched: 0,
            inconsistency: None,
        }
    }

    pub fn spec(&self) -> &'q QuerySpec {
        self.spec
    }

    pub fn state(&self) -> IterState {
        self.state
    }

    /// Total reported by the service, once known
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Number of items handed out so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// Number of page requests made for enumeration (the count probe excluded)
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// The inconsistency that halted enumeration, if any
    pub fn inconsistency(&self) -> Option<&PaginationInconsistency> {
        self.inconsistency.as_ref()
    }

    /// Turns a recorded inconsistency into an error
    pub fn ensure_consistent(&self) -> Result<()> {
        match &self.inconsistency {
            Some(inconsistency) => Err(RegistryError::PaginationInconsistency(
                inconsistency.clone(),
            )),
            None => Ok(()),
        }
    }

    /// Total number of items the query matches
    ///
    /// The first call that finds no cached total sends a single one-item
    /// request; every later call, and every call after the first page has
    /// been fetched, is answered from the cache. Enumeration state is not
    /// touched.
    pub async fn count<E>(&mut self, executor: &E) -> Result<u64>
    where
        E: RemoteExecutor + ?Sized,
    {
        if let Some(total) = self.total {
            return Ok(total);
        }

        let probe = PageRequest::probe();
        tracing::debug!("Probing total of {}", self.spec.describe());
        let response = executor.execute(self.spec, probe).await?;
        let page = ResultPage::from_response(self.spec, probe, response)?;

        self.total = Some(page.total());
        Ok(page.total())
    }

    /// Pull-based enumeration: the next item, fetching a page if needed
    ///
    /// Returns `None` once every item was yielded, after an inconsistency
    /// halted enumeration, or after an error was returned.
    pub async fn next<E>(&mut self, executor: &E) -> Option<Result<Value>>
    where
        E: RemoteExecutor + ?Sized,
    {
        loop {
            match self.state {
                IterState::Exhausted | IterState::Failed => return None,
                IterState::NotStarted => {
                    if self.total == Some(0) {
                        self.state = IterState::Exhausted;
                        return None;
                    }
                    self.state = IterState::FetchingPage;
                }
                IterState::HasPage => {
                    if let Some(item) = self.buffer.next() {
                        self.yielded += 1;
                        return Some(Ok(item));
                    }
                    if self.more_pages {
                        self.state = IterState::FetchingPage;
                    } else {
                        tracing::debug!(
                            "Finished {} after {} items in {} pages",
                            self.spec.describe(),
                            self.yielded,
                            self.pages_fetched
                        );
                        self.state = IterState::Exhausted;
                    }
                }
                IterState::FetchingPage => {
                    if let Err(e) = self.fetch_page(executor).await {
                        tracing::debug!("Page fetch for {} failed: {}", self.spec.describe(), e);
                        self.state = IterState::Failed;
                        return Some(Err(e));
                    }
                }
            }
        }
    }

    /// Push-based enumeration as a stream
    ///
    /// The stream borrows the iterator; once it is dropped, `count()` and the
    /// inspection methods are available again.
    pub fn produce<'s, E>(&'s mut self, executor: &'s E) -> BoxStream<'s, Result<Value>>
    where
        E: RemoteExecutor + ?Sized,
        'q: 's,
    {
        Box::pin(stream::unfold(self, move |iter| async move {
            iter.next(executor).await.map(|item| (item, iter))
        }))
    }

    /// Drains the iterator into a vector, stopping at the first error
    pub async fn collect_all<E>(&mut self, executor: &E) -> Result<Vec<Value>>
    where
        E: RemoteExecutor + ?Sized,
    {
        let mut items = Vec::new();
        while let Some(item) = self.next(executor).await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Fetches the next page and moves to `HasPage` or `Exhausted`
    async fn fetch_page<E>(&mut self, executor: &E) -> Result<()>
    where
        E: RemoteExecutor + ?Sized,
    {
        let request = self.next_page;
        tracing::debug!(
            "Fetching page {} (size {}) of {}",
            request.page,
            request.count,
            self.spec.describe()
        );

        let response = executor.execute(self.spec, request).await?;
        let page = ResultPage::from_response(self.spec, request, response)?;
        self.pages_fetched += 1;

        let expected = *self.total.get_or_insert(page.total());
        if page.total() != expected {
            self.halt(PaginationInconsistency::TotalChanged {
                page: request.page,
                expected,
                reported: page.total(),
            });
            return Ok(());
        }

        let remaining = expected.saturating_sub(self.yielded);
        if page.is_empty() && remaining > 0 {
            self.halt(PaginationInconsistency::EmptyPage {
                page: request.page,
                yielded: self.yielded,
                expected,
            });
            return Ok(());
        }

        let received = page.len() as u64;
        let delivered = received.min(remaining);
        let mut more = page.has_more(self.yielded + delivered);
        let mut flagged = None;

        if received > remaining {
            flagged = Some(PaginationInconsistency::Overflow {
                page: request.page,
                received,
                remaining,
                expected,
            });
            more = false;
        } else if !more && self.yielded + delivered < expected {
            flagged = Some(PaginationInconsistency::PrematureEnd {
                pages: page.pages().unwrap_or(request.page),
                yielded: self.yielded + delivered,
                expected,
            });
        }

        let mut items = page.into_items();
        items.truncate(delivered as usize);

        self.buffer = items.into_iter();
        self.more_pages = more;
        self.next_page = request.next();
        self.state = IterState::HasPage;

        if let Some(inconsistency) = flagged {
            tracing::warn!(
                "Pagination of {} will stop early: {}",
                self.spec.describe(),
                inconsistency
            );
            self.inconsistency = Some(inconsistency);
        }

        Ok(())
    }

    /// Stops enumeration right away because of an inconsistency
    fn halt(&mut self, inconsistency: PaginationInconsistency) {
        tracing::warn!(
            "Pagination of {} halted after {} items: {}",
            self.spec.describe(),
            self.yielded,
            inconsistency
        );
        self.inconsistency = Some(inconsistency);
        self.buffer = Vec::new().into_iter();
        self.more_pages = false;
        self.state = IterState::Exhausted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ServiceError;
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Mutex;

    /// Serves a fixed list of article uris, paged by the requested size
    struct FixedExecutor {
        uris: Vec<String>,
        calls: Mutex<Vec<PageRequest>>,
    }

    impl FixedExecutor {
        fn new(n: usize) -> Self {
            Self {
                uris: (0..n).map(|i| format!("art-{}", i)).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<PageRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteExecutor for FixedExecutor {
        async fn execute(
            &self,
            spec: &QuerySpec,
            page: PageRequest,
        ) -> std::result::Result<Value, ServiceError> {
            self.calls.lock().unwrap().push(page);
            let start = ((page.page - 1) * page.count) as usize;
            let results: Vec<Value> = self
                .uris
                .iter()
                .skip(start)
                .take(page.count as usize)
                .map(|uri| json!({ "uri": uri }))
                .collect();
            let mut response = serde_json::Map::new();
            response.insert(
                spec.event_uri().unwrap_or_default().to_string(),
                json!({ "articles": { "results": results, "totalResults": self.uris.len() } }),
            );
            Ok(Value::Object(response))
        }
    }

    fn spec(page_size: u32) -> QuerySpec {
        QuerySpec::for_event("eng-1").page_size(page_size).build().unwrap()
    }

    #[tokio::test]
    async fn test_enumerates_all_pages_in_order() {
        let executor = FixedExecutor::new(7);
        let spec = spec(3);
        let mut iter = PagedIterator::new(&spec);

        let items = iter.collect_all(&executor).await.unwrap();

        let uris: Vec<&str> = items.iter().map(|a| a["uri"].as_str().unwrap()).collect();
        assert_eq!(
            uris,
            vec!["art-0", "art-1", "art-2", "art-3", "art-4", "art-5", "art-6"]
        );
        assert_eq!(iter.state(), IterState::Exhausted);
        assert_eq!(iter.pages_fetched(), 3);
        assert_eq!(
            executor.calls(),
            vec![
                PageRequest::new(1, 3),
                PageRequest::new(2, 3),
                PageRequest::new(3, 3)
            ]
        );
        assert!(iter.ensure_consistent().is_ok());
    }

    #[tokio::test]
    async fn test_count_is_cached() {
        let executor = FixedExecutor::new(4);
        let spec = spec(2);
        let mut iter = PagedIterator::new(&spec);

        assert_eq!(iter.count(&executor).await.unwrap(), 4);
        assert_eq!(iter.count(&executor).await.unwrap(), 4);

        assert_eq!(executor.calls(), vec![PageRequest::probe()]);
        assert_eq!(iter.state(), IterState::NotStarted);
    }

    #[tokio::test]
    async fn test_no_fetch_until_first_item() {
        let executor = FixedExecutor::new(4);
        let spec = spec(2);
        let mut iter = PagedIterator::new(&spec);

        assert!(executor.calls().is_empty());
        let first = iter.next(&executor).await.unwrap().unwrap();
        assert_eq!(first["uri"], "art-0");
        assert_eq!(executor.calls().len(), 1);
        assert_eq!(iter.state(), IterState::HasPage);
    }

    #[tokio::test]
    async fn test_zero_total_cached_skips_fetch() {
        let executor = FixedExecutor::new(0);
        let spec = spec(2);
        let mut iter = PagedIterator::new(&spec);

        assert_eq!(iter.count(&executor).await.unwrap(), 0);
        assert!(iter.next(&executor).await.is_none());
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_matches_pull() {
        let executor = FixedExecutor::new(5);
        let spec = spec(2);
        let mut iter = PagedIterator::new(&spec);

        let items: Vec<Value> = iter
            .produce(&executor)
            .map(|item| item.unwrap())
            .collect()
            .await;

        assert_eq!(items.len(), 5);
        assert_eq!(iter.count(&executor).await.unwrap(), 5);
        assert_eq!(iter.yielded(), 5);
    }
}
