//! Event detail queries and event search
//!
//! These are single-shot requests: the service answers with one JSON object
//! and nothing is paginated.

use crate::config::MAX_PAGE_SIZE;
use crate::executor::PageRequest;
use crate::query::{
    uri_from_uri_wgt, QuerySpec, ResultShape, ReturnInfo, SortBy, SortDirection,
};
use crate::{RegistryError, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// A concept URI with a relevance weight, used to seed similarity requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightedConcept {
    pub uri: String,
    pub wgt: u32,
}

impl WeightedConcept {
    pub fn new(uri: impl Into<String>, wgt: u32) -> Self {
        Self {
            uri: uri.into(),
            wgt,
        }
    }
}

/// What to return about the queried events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRequest {
    /// Core event information
    Info(ReturnInfo),
    /// One page of the event's articles, optionally filtered
    Articles {
        page: PageRequest,
        lang: Option<String>,
        concept_uri: Option<String>,
        keyword: Option<String>,
        source_uri: Option<String>,
        sort: Option<(SortBy, SortDirection)>,
        return_info: ReturnInfo,
    },
    /// All article URIs of the event with their weights
    ArticleUriWgts,
    /// Top keywords of the event's articles
    KeywordAggr,
    /// Publishing sources of the event's articles
    SourceAggr,
    /// Article counts over time
    ArticleTrend,
    /// Events similar to a weighted concept vector
    SimilarEvents {
        concepts: Vec<WeightedConcept>,
        add_article_trend_info: bool,
        return_info: ReturnInfo,
    },
    /// Stories similar to a weighted concept vector
    SimilarStories {
        concepts: Vec<WeightedConcept>,
        return_info: ReturnInfo,
    },
}

impl EventRequest {
    /// Unfiltered first page of articles
    pub fn articles() -> Self {
        Self::Articles {
            page: PageRequest::new(1, MAX_PAGE_SIZE),
            lang: None,
            concept_uri: None,
            keyword: None,
            source_uri: None,
            sort: None,
            return_info: ReturnInfo::default(),
        }
    }

    /// First page of articles filtered and sorted like `spec`
    ///
    /// The page size follows the spec, or the service maximum. The response's
    /// `totalResults` is comparable with `PagedIterator::count` for `spec`.
    pub fn articles_matching(spec: &QuerySpec) -> Self {
        let return_info = match spec.shape() {
            ResultShape::Articles(info) => info.clone(),
            ResultShape::UriWgtList => ReturnInfo::default(),
        };
        Self::Articles {
            page: PageRequest::new(1, spec.page_size().unwrap_or(MAX_PAGE_SIZE)),
            lang: spec.lang().map(str::to_string),
            concept_uri: spec.concept_uri().map(str::to_string),
            keyword: spec.keyword().map(str::to_string),
            source_uri: spec.source_uri().map(str::to_string),
            sort: spec.sort_by().zip(spec.sort_direction()),
            return_info,
        }
    }

    /// Value of `resultType`, which is also the response section key
    pub fn result_type(&self) -> &'static str {
        match self {
            Self::Info(_) => "info",
            Self::Articles { .. } => "articles",
            Self::ArticleUriWgts => "uriWgtList",
            Self::KeywordAggr => "keywordAggr",
            Self::SourceAggr => "sourceExAggr",
            Self::ArticleTrend => "articleTrend",
            Self::SimilarEvents { .. } => "similarEvents",
            Self::SimilarStories { .. } => "similarStories",
        }
    }

    fn apply(&self, body: &mut Map<String, Value>) {
        body.insert("resultType".into(), self.result_type().into());

        match self {
            Self::Info(info) => info.apply(body),
            Self::Articles {
                page,
                lang,
                concept_uri,
                keyword,
                source_uri,
                sort,
                return_info,
            } => {
                body.insert("articlesPage".into(), page.page.into());
                body.insert("articlesCount".into(), page.count.into());
                for (key, value) in [
                    ("lang", lang),
                    ("conceptUri", concept_uri),
                    ("keyword", keyword),
                    ("sourceUri", source_uri),
                ] {
                    if let Some(v) = value {
                        body.insert(key.into(), v.clone().into());
                    }
                }
                if let Some((sort_by, direction)) = sort {
                    body.insert("articlesSortBy".into(), sort_by.as_str().into());
                    body.insert(
                        "articlesSortByAsc".into(),
                        direction.is_ascending().into(),
                    );
                }
                return_info.apply(body);
            }
            Self::SimilarEvents {
                concepts,
                add_article_trend_info,
                return_info,
            } => {
                body.insert("similarEventsConcepts".into(), json!(concepts));
                if *add_article_trend_info {
                    body.insert("similarEventsAddArticleTrendInfo".into(), true.into());
                }
                return_info.apply(body);
            }
            Self::SimilarStories {
                concepts,
                return_info,
            } => {
                body.insert("similarStoriesConcepts".into(), json!(concepts));
                return_info.apply(body);
            }
            Self::ArticleUriWgts | Self::KeywordAggr | Self::SourceAggr | Self::ArticleTrend => {}
        }
    }
}

/// Detail query against one or more known events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    event_uris: Vec<String>,
    request: EventRequest,
}

impl EventQuery {
    /// Query for a single event
    ///
    /// # Errors
    ///
    /// `RegistryError::Configuration` if `event_uri` is blank.
    pub fn new(event_uri: impl Into<String>, request: EventRequest) -> Result<Self> {
        Self::many(vec![event_uri.into()], request)
    }

    /// Query for several events at once
    ///
    /// # Errors
    ///
    /// `RegistryError::Configuration` if `event_uris` is empty or has a blank entry.
    pub fn many(event_uris: Vec<String>, request: EventRequest) -> Result<Self> {
        if event_uris.is_empty() {
            return Err(RegistryError::Configuration(
                "event query needs at least one event uri".to_string(),
            ));
        }
        if event_uris.iter().any(|u| u.trim().is_empty()) {
            return Err(RegistryError::Configuration(
                "event uri cannot be blank".to_string(),
            ));
        }
        Ok(Self {
            event_uris,
            request,
        })
    }

    pub fn event_uris(&self) -> &[String] {
        &self.event_uris
    }

    pub fn request(&self) -> &EventRequest {
        &self.request
    }

    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        let uris = match self.event_uris.as_slice() {
            [single] => Value::String(single.clone()),
            many => json!(many),
        };
        body.insert("eventUri".into(), uris);
        self.request.apply(&mut body);
        Value::Object(body)
    }
}

/// One event's entry in an event query response
#[derive(Debug, Clone, PartialEq)]
pub enum EventEntry {
    /// The event exists; the value holds the requested sections
    Found(Value),
    /// The event was merged into another one and carries no data
    Merged { new_uri: String },
}

impl EventEntry {
    pub fn as_found(&self) -> Option<&Value> {
        match self {
            Self::Found(v) => Some(v),
            Self::Merged { .. } => None,
        }
    }
}

/// Parsed event query response, keyed by event URI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResults {
    entries: BTreeMap<String, EventEntry>,
}

impl EventResults {
    /// Unwraps a raw event query response
    ///
    /// # Errors
    ///
    /// `RegistryError::MalformedResponse` if the response or any entry is not
    /// a JSON object.
    pub fn from_response(response: &Value) -> Result<Self> {
        let object = response.as_object().ok_or_else(|| {
            RegistryError::malformed("event query", "response is not a JSON object")
        })?;

        let mut entries = BTreeMap::new();
        for (uri, entry) in object {
            if !entry.is_object() {
                return Err(RegistryError::malformed(
                    format!("event {}", uri),
                    "entry is not a JSON object",
                ));
            }
            let parsed = match entry.get("newEventUri").and_then(Value::as_str) {
                Some(new_uri) => EventEntry::Merged {
                    new_uri: new_uri.to_string(),
                },
                None => EventEntry::Found(entry.clone()),
            };
            entries.insert(uri.clone(), parsed);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, uri: &str) -> Option<&EventEntry> {
        self.entries.get(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that carry data, skipping merged events
    pub fn found(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter()
            .filter_map(|(uri, entry)| entry.as_found().map(|v| (uri, v)))
    }
}

/// Event search returning weighted event URIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSearch {
    pub lang: Option<String>,
    pub concept_uri: Option<String>,
    pub keyword: Option<String>,
    pub source_uri: Option<String>,
    pub count: u32,
    pub sort_by: SortBy,
}

impl Default for EventSearch {
    fn default() -> Self {
        Self {
            lang: None,
            concept_uri: None,
            keyword: None,
            source_uri: None,
            count: 10,
            sort_by: SortBy::Size,
        }
    }
}

impl EventSearch {
    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        for (key, value) in [
            ("lang", &self.lang),
            ("conceptUri", &self.concept_uri),
            ("keyword", &self.keyword),
            ("sourceUri", &self.source_uri),
        ] {
            if let Some(v) = value {
                body.insert(key.into(), v.clone().into());
            }
        }
        body.insert("resultType".into(), "uriWgtList".into());
        body.insert("uriWgtListPage".into(), 1.into());
        body.insert("uriWgtListCount".into(), self.count.into());
        body.insert("uriWgtListSortBy".into(), self.sort_by.as_str().into());
        Value::Object(body)
    }

    /// Extracts event URIs, in service order, from a search response
    pub fn parse_uris(response: &Value) -> Result<Vec<String>> {
        let results = response
            .get("uriWgtList")
            .and_then(|s| s.get("results"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RegistryError::malformed("event search", "missing uriWgtList.results array")
            })?;

        results
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(|s| uri_from_uri_wgt(s).to_string())
                    .ok_or_else(|| {
                        RegistryError::malformed("event search", "uriWgtList entry is not a string")
                    })
            })
            .collect()
    }
}
