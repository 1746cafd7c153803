//! Paged article query description
//!
//! A `QuerySpec` is an immutable value built once and shared by any number of
//! iterations. Filters are conjunctive: every filter present narrows the
//! result set.

use crate::config::MAX_PAGE_SIZE;
use crate::executor::PageRequest;
use crate::query::{ReturnInfo, SortBy, SortDirection, ARTICLES_ENDPOINT, EVENT_ENDPOINT};
use crate::{RegistryError, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Which shape of data the service returns for each item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultShape {
    /// Full article records, with optional fields selected by the return info
    Articles(ReturnInfo),
    /// `"uri:wgt"` strings only
    UriWgtList,
}

impl ResultShape {
    /// Response section holding the results, also used as the paging prefix
    pub fn section_key(&self) -> &'static str {
        match self {
            Self::Articles(_) => "articles",
            Self::UriWgtList => "uriWgtList",
        }
    }
}

impl Default for ResultShape {
    fn default() -> Self {
        Self::Articles(ReturnInfo::default())
    }
}

/// Immutable description of a paged article query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    event_uri: Option<String>,
    lang: Option<String>,
    concept_uri: Option<String>,
    keyword: Option<String>,
    source_uri: Option<String>,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
    sort_by: Option<SortBy>,
    sort_direction: Option<SortDirection>,
    page_size: Option<u32>,
    shape: ResultShape,
}

impl QuerySpec {
    /// Starts an empty builder
    pub fn builder() -> QuerySpecBuilder {
        QuerySpecBuilder::default()
    }

    /// Starts a builder targeting the articles of one event
    pub fn for_event(event_uri: impl Into<String>) -> QuerySpecBuilder {
        QuerySpecBuilder::default().event(event_uri)
    }

    pub fn event_uri(&self) -> Option<&str> {
        self.event_uri.as_deref()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn concept_uri(&self) -> Option<&str> {
        self.concept_uri.as_deref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }

    pub fn date_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.date_start, self.date_end)
    }

    pub fn sort_by(&self) -> Option<SortBy> {
        self.sort_by
    }

    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort_direction
    }

    /// Configured page size, if any
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub fn shape(&self) -> &ResultShape {
        &self.shape
    }

    /// Returns a copy of this spec with a different sort order
    ///
    /// The original is untouched, so one base query can be enumerated in
    /// both directions.
    pub fn sorted(&self, sort_by: SortBy, direction: SortDirection) -> Self {
        Self {
            sort_by: Some(sort_by),
            sort_direction: Some(direction),
            ..self.clone()
        }
    }

    /// Service path this query is posted to
    pub fn endpoint(&self) -> &'static str {
        if self.event_uri.is_some() {
            EVENT_ENDPOINT
        } else {
            ARTICLES_ENDPOINT
        }
    }

    /// Short human-readable label for logs and error contexts
    pub fn describe(&self) -> String {
        match &self.event_uri {
            Some(uri) => format!("event {}", uri),
            None => "article search".to_string(),
        }
    }

    /// Builds the JSON request body for one page
    ///
    /// Authentication is added by the executor, not here.
    pub fn to_payload(&self, page: PageRequest) -> Value {
        let mut body = Map::new();
        let prefix = self.shape.section_key();

        if let Some(uri) = &self.event_uri {
            body.insert("eventUri".into(), uri.clone().into());
        }
        insert_opt(&mut body, "lang", &self.lang);
        insert_opt(&mut body, "conceptUri", &self.concept_uri);
        insert_opt(&mut body, "keyword", &self.keyword);
        insert_opt(&mut body, "sourceUri", &self.source_uri);
        if let Some(start) = self.date_start {
            body.insert("dateStart".into(), start.format("%Y-%m-%d").to_string().into());
        }
        if let Some(end) = self.date_end {
            body.insert("dateEnd".into(), end.format("%Y-%m-%d").to_string().into());
        }

        body.insert("resultType".into(), prefix.into());
        body.insert(format!("{}Page", prefix), page.page.into());
        body.insert(format!("{}Count", prefix), page.count.into());
        if let Some(sort_by) = self.sort_by {
            body.insert(format!("{}SortBy", prefix), sort_by.as_str().into());
        }
        if let Some(direction) = self.sort_direction {
            body.insert(
                format!("{}SortByAsc", prefix),
                direction.is_ascending().into(),
            );
        }

        if let ResultShape::Articles(info) = &self.shape {
            info.apply(&mut body);
        }

        Value::Object(body)
    }
}

fn insert_opt(body: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        body.insert(key.to_string(), Value::String(v.clone()));
    }
}

/// Builder for [`QuerySpec`]
///
/// All validation happens in [`QuerySpecBuilder::build`], before any network
/// activity.
#[derive(Debug, Clone, Default)]
pub struct QuerySpecBuilder {
    event_uri: Option<String>,
    lang: Option<String>,
    concept_uri: Option<String>,
    keyword: Option<String>,
    source_uri: Option<String>,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
    sort_by: Option<SortBy>,
    sort_direction: Option<SortDirection>,
    page_size: Option<u32>,
    shape: ResultShape,
}

impl QuerySpecBuilder {
    pub fn event(mut self, uri: impl Into<String>) -> Self {
        self.event_uri = Some(uri.into());
        self
    }

    /// ISO 639-3 language code, e.g. `eng`
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn concept(mut self, uri: impl Into<String>) -> Self {
        self.concept_uri = Some(uri.into());
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn source(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = Some(uri.into());
        self
    }

    pub fn date_start(mut self, date: NaiveDate) -> Self {
        self.date_start = Some(date);
        self
    }

    pub fn date_end(mut self, date: NaiveDate) -> Self {
        self.date_end = Some(date);
        self
    }

    pub fn sort(mut self, sort_by: SortBy, direction: SortDirection) -> Self {
        self.sort_by = Some(sort_by);
        self.sort_direction = Some(direction);
        self
    }

    /// Sort key only; the service picks the direction
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn shape(mut self, shape: ResultShape) -> Self {
        self.shape = shape;
        self
    }

    /// Validates the parameters and produces the `QuerySpec`
    ///
    /// # Errors
    ///
    /// `RegistryError::Configuration` when no selector (event, concept,
    /// keyword or source) is given, a string parameter is blank, the
    /// language code is not three lowercase letters, the page size is out of
    /// range, or the date range is inverted.
    pub fn build(self) -> Result<QuerySpec> {
        for (name, value) in [
            ("event uri", &self.event_uri),
            ("lang", &self.lang),
            ("concept uri", &self.concept_uri),
            ("keyword", &self.keyword),
            ("source uri", &self.source_uri),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(RegistryError::Configuration(format!(
                    "{} cannot be blank",
                    name
                )));
            }
        }

        if self.event_uri.is_none()
            && self.concept_uri.is_none()
            && self.keyword.is_none()
            && self.source_uri.is_none()
        {
            return Err(RegistryError::Configuration(
                "query needs at least one selector: event uri, concept uri, keyword or source uri"
                    .to_string(),
            ));
        }

        if let Some(lang) = &self.lang {
            if lang.len() != 3 || !lang.chars().all(|c| c.is_ascii_lowercase()) {
                return Err(RegistryError::Configuration(format!(
                    "lang must be a three-letter ISO 639-3 code, got '{}'",
                    lang
                )));
            }
        }

        if let Some(size) = self.page_size {
            if size < 1 || size > MAX_PAGE_SIZE {
                return Err(RegistryError::Configuration(format!(
                    "page size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, size
                )));
            }
        }

        if let (Some(start), Some(end)) = (self.date_start, self.date_end) {
            if start > end {
                return Err(RegistryError::Configuration(format!(
                    "date range is inverted: {} > {}",
                    start, end
                )));
            }
        }

        Ok(QuerySpec {
            event_uri: self.event_uri,
            lang: self.lang,
            concept_uri: self.concept_uri,
            keyword: self.keyword,
            source_uri: self.source_uri,
            date_start: self.date_start,
            date_end: self.date_end,
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
            page_size: self.page_size,
            shape: self.shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_only_spec() {
        let spec = QuerySpec::for_event("eng-2860795").build().unwrap();
        assert_eq!(spec.event_uri(), Some("eng-2860795"));
        assert_eq!(spec.endpoint(), EVENT_ENDPOINT);
        assert_eq!(spec.page_size(), None);
    }

    #[test]
    fn test_no_selector_is_rejected() {
        let result = QuerySpec::builder().lang("eng").build();
        assert!(matches!(result, Err(RegistryError::Configuration(_))));

        let result = QuerySpec::builder().build();
        assert!(matches!(result, Err(RegistryError::Configuration(_))));
    }

    #[test]
    fn test_keyword_alone_is_a_selector() {
        let spec = QuerySpec::builder().keyword("Trump").build().unwrap();
        assert_eq!(spec.endpoint(), ARTICLES_ENDPOINT);
        assert_eq!(spec.describe(), "article search");
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(QuerySpec::for_event("  ").build().is_err());
        assert!(QuerySpec::for_event("eng-1").lang("en").build().is_err());
        assert!(QuerySpec::for_event("eng-1").lang("ENG").build().is_err());
        assert!(QuerySpec::for_event("eng-1").page_size(0).build().is_err());
        assert!(QuerySpec::for_event("eng-1").page_size(101).build().is_err());

        let start = NaiveDate::from_ymd_opt(2017, 5, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 5, 1).unwrap();
        assert!(QuerySpec::for_event("eng-1")
            .date_start(start)
            .date_end(end)
            .build()
            .is_err());
    }

    #[test]
    fn test_structural_equality() {
        let a = QuerySpec::for_event("eng-1").lang("eng").build().unwrap();
        let b = QuerySpec::for_event("eng-1").lang("eng").build().unwrap();
        let c = QuerySpec::for_event("eng-1").lang("deu").build().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sorted_copy_leaves_original() {
        let base = QuerySpec::for_event("eng-1").build().unwrap();
        let asc = base.sorted(SortBy::Date, SortDirection::Ascending);
        assert_eq!(base.sort_by(), None);
        assert_eq!(asc.sort_by(), Some(SortBy::Date));
        assert_eq!(asc.sort_direction(), Some(SortDirection::Ascending));
        assert_eq!(asc.event_uri(), base.event_uri());
    }

    #[test]
    fn test_payload_for_article_page() {
        let spec = QuerySpec::for_event("eng-2860795")
            .lang("eng")
            .concept("http://en.wikipedia.org/wiki/Donald_Trump")
            .date_start(NaiveDate::from_ymd_opt(2017, 4, 1).unwrap())
            .sort(SortBy::Date, SortDirection::Descending)
            .build()
            .unwrap();

        let body = spec.to_payload(PageRequest::new(3, 50));

        assert_eq!(body["eventUri"], "eng-2860795");
        assert_eq!(body["lang"], "eng");
        assert_eq!(body["conceptUri"], "http://en.wikipedia.org/wiki/Donald_Trump");
        assert_eq!(body["dateStart"], "2017-04-01");
        assert!(body.get("dateEnd").is_none());
        assert!(body.get("keyword").is_none());
        assert_eq!(body["resultType"], "articles");
        assert_eq!(body["articlesPage"], 3);
        assert_eq!(body["articlesCount"], 50);
        assert_eq!(body["articlesSortBy"], "date");
        assert_eq!(body["articlesSortByAsc"], false);
        assert_eq!(body["articleBodyLen"], -1);
    }

    #[test]
    fn test_payload_for_uri_list() {
        let spec = QuerySpec::builder()
            .keyword("Trump")
            .shape(ResultShape::UriWgtList)
            .build()
            .unwrap();

        let body = spec.to_payload(PageRequest::probe());

        assert!(body.get("eventUri").is_none());
        assert_eq!(body["resultType"], "uriWgtList");
        assert_eq!(body["uriWgtListPage"], 1);
        assert_eq!(body["uriWgtListCount"], 1);
        assert!(body.get("articleBodyLen").is_none());
    }
}
