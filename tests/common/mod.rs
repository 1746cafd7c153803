//! Stub executors shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use event_registry::executor::{PageRequest, RemoteExecutor, ServiceError};
use event_registry::query::{QuerySpec, SortBy, SortDirection};
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const TRUMP: &str = "http://en.wikipedia.org/wiki/Donald_Trump";
pub const FOX: &str = "foxnews.com";

/// Builds a deterministic article
///
/// Languages, concepts, sources, titles, dates and weights are spread so
/// that every filter matches a strict, non-empty subset.
pub fn article(i: usize) -> Value {
    let lang = ["eng", "deu", "spa"][i % 3];
    let concepts: Vec<Value> = if i % 4 == 0 {
        vec![json!({ "uri": TRUMP, "score": 5 })]
    } else {
        vec![json!({ "uri": "http://en.wikipedia.org/wiki/Angela_Merkel", "score": 3 })]
    };
    let source = if i % 5 == 0 { FOX } else { "bbc.co.uk" };
    let title = if i % 6 == 0 {
        format!("Trump statement #{}", i)
    } else {
        format!("Summit update #{}", i)
    };

    json!({
        "uri": format!("{}", 900_000 + i),
        "url": format!("https://{}/news/{}", source, i),
        "title": title,
        "body": "Article body",
        "lang": lang,
        "date": format!("2017-03-{:02}", 1 + (i * 7) % 28),
        "wgt": (i * 37) % 100,
        "source": { "uri": source, "title": source },
        "concepts": concepts,
    })
}

/// Simulates the service over an in-memory event
///
/// Applies the query's filters conjunctively, sorts when asked, and pages
/// the result the way the service does.
pub struct DatasetExecutor {
    event_uri: String,
    articles: Vec<Value>,
    calls: Mutex<Vec<PageRequest>>,
}

impl DatasetExecutor {
    pub fn new(event_uri: &str, size: usize) -> Self {
        Self {
            event_uri: event_uri.to_string(),
            articles: (0..size).map(article).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn matches(spec: &QuerySpec, article: &Value) -> bool {
        if let Some(lang) = spec.lang() {
            if article["lang"] != lang {
                return false;
            }
        }
        if let Some(concept) = spec.concept_uri() {
            let found = article["concepts"]
                .as_array()
                .map(|list| list.iter().any(|c| c["uri"] == concept))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }
        if let Some(keyword) = spec.keyword() {
            let title = article["title"].as_str().unwrap_or_default().to_lowercase();
            if !title.contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        if let Some(source) = spec.source_uri() {
            if article["source"]["uri"] != source {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl RemoteExecutor for DatasetExecutor {
    async fn execute(&self, spec: &QuerySpec, page: PageRequest) -> Result<Value, ServiceError> {
        self.calls.lock().unwrap().push(page);

        let mut matching: Vec<Value> = self
            .articles
            .iter()
            .filter(|a| Self::matches(spec, a))
            .cloned()
            .collect();

        if let Some(SortBy::Date) = spec.sort_by() {
            matching.sort_by(|a, b| {
                let a = a["date"].as_str().unwrap_or_default();
                let b = b["date"].as_str().unwrap_or_default();
                a.cmp(b)
            });
            if spec.sort_direction() == Some(SortDirection::Descending) {
                matching.reverse();
            }
        }

        let total = matching.len();
        let size = page.count as usize;
        let pages = total.div_ceil(size);
        let results: Vec<Value> = matching
            .into_iter()
            .skip((page.page as usize - 1) * size)
            .take(size)
            .collect();

        let mut response = Map::new();
        response.insert(
            self.event_uri.clone(),
            json!({
                "articles": {
                    "results": results,
                    "totalResults": total,
                    "page": page.page,
                    "pages": pages,
                }
            }),
        );
        Ok(Value::Object(response))
    }
}

/// Returns queued responses in order and records every request
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Result<Value, ServiceError>>>,
    calls: Mutex<Vec<PageRequest>>,
}

impl ScriptedExecutor {
    pub fn new(responses: Vec<Result<Value, ServiceError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn execute(&self, _spec: &QuerySpec, page: PageRequest) -> Result<Value, ServiceError> {
        self.calls.lock().unwrap().push(page);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Api("script exhausted".to_string())))
    }
}

/// One event-scoped article page with `count` items numbered from `first`
pub fn event_page(event_uri: &str, first: usize, count: usize, total: u64) -> Value {
    let results: Vec<Value> = (first..first + count).map(article).collect();
    let mut response = Map::new();
    response.insert(
        event_uri.to_string(),
        json!({ "articles": { "results": results, "totalResults": total } }),
    );
    Value::Object(response)
}
