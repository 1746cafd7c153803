//! Expected-shape descriptors for event query responses

use crate::query::EventRequest;
use crate::validate::records::{require, require_str, wrong_type};
use crate::validate::{
    ensure_valid_article, ensure_valid_event, ensure_valid_story, ValidationError,
    ValidationResult,
};
use serde_json::Value;

/// Optional sub-structure of an event entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Info,
    Articles,
    UriWgtList,
    KeywordAggr,
    SourceExAggr,
    ArticleTrend,
    SimilarEvents,
    SimilarStories,
}

impl Section {
    /// Key of the section in an event entry
    pub fn key(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Articles => "articles",
            Self::UriWgtList => "uriWgtList",
            Self::KeywordAggr => "keywordAggr",
            Self::SourceExAggr => "sourceExAggr",
            Self::ArticleTrend => "articleTrend",
            Self::SimilarEvents => "similarEvents",
            Self::SimilarStories => "similarStories",
        }
    }

    /// The section an event request populates
    pub fn for_request(request: &EventRequest) -> Self {
        match request {
            EventRequest::Info(_) => Self::Info,
            EventRequest::Articles { .. } => Self::Articles,
            EventRequest::ArticleUriWgts => Self::UriWgtList,
            EventRequest::KeywordAggr => Self::KeywordAggr,
            EventRequest::SourceAggr => Self::SourceExAggr,
            EventRequest::ArticleTrend => Self::ArticleTrend,
            EventRequest::SimilarEvents { .. } => Self::SimilarEvents,
            EventRequest::SimilarStories { .. } => Self::SimilarStories,
        }
    }
}

/// Which sections an event entry must and must not carry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedShape {
    present: Vec<Section>,
    absent: Vec<Section>,
    similar_event_trends: bool,
}

impl ExpectedShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shape a response to `request` should have
    pub fn for_request(request: &EventRequest) -> Self {
        let shape = Self::new().require(Section::for_request(request));
        match request {
            EventRequest::SimilarEvents {
                add_article_trend_info: true,
                ..
            } => shape.with_similar_event_trends(),
            _ => shape,
        }
    }

    pub fn require(mut self, section: Section) -> Self {
        self.present.push(section);
        self
    }

    pub fn forbid(mut self, section: Section) -> Self {
        self.absent.push(section);
        self
    }

    /// `similarEvents` must also carry `trends`
    pub fn with_similar_event_trends(mut self) -> Self {
        self.similar_event_trends = true;
        self
    }

    pub fn present(&self) -> &[Section] {
        &self.present
    }

    pub fn absent(&self) -> &[Section] {
        &self.absent
    }
}

/// Validates one event entry against an expected shape
///
/// Each required section is type-checked; nested articles, events and
/// stories go through their record validators. A `keywordAggr` holding a
/// service-side `error` is accepted and logged.
pub fn validate_event_entry(entry: &Value, shape: &ExpectedShape, context: &str) -> ValidationResult {
    for section in &shape.absent {
        if entry.get(section.key()).is_some() {
            return Err(ValidationError::Unexpected {
                context: context.to_string(),
                field: section.key().to_string(),
            });
        }
    }

    for section in &shape.present {
        let value = require(entry, section.key(), context)?;
        let section_context = format!("{}.{}", context, section.key());

        match section {
            Section::Info => ensure_valid_event(value, &section_context)?,
            Section::Articles => {
                for article in results(value, &section_context)? {
                    ensure_valid_article(article, &section_context)?;
                }
            }
            Section::UriWgtList => {
                if results(value, &section_context)?.iter().any(|v| !v.is_string()) {
                    return Err(wrong_type(&section_context, "results", "a list of strings"));
                }
            }
            Section::KeywordAggr => {
                if let Some(error) = value.get("error").and_then(Value::as_str) {
                    tracing::warn!("{}: service returned an error: {}", section_context, error);
                    continue;
                }
                for keyword in results(value, &section_context)? {
                    require_str(keyword, "keyword", &section_context)?;
                    if !require(keyword, "weight", &section_context)?.is_number() {
                        return Err(wrong_type(&section_context, "weight", "a number"));
                    }
                }
            }
            Section::SourceExAggr | Section::ArticleTrend => {
                if value.is_null() {
                    return Err(wrong_type(context, section.key(), "present and not null"));
                }
            }
            Section::SimilarEvents => {
                for event in results(value, &section_context)? {
                    ensure_valid_event(event, &section_context)?;
                }
                if shape.similar_event_trends {
                    require(value, "trends", &section_context)?;
                }
            }
            Section::SimilarStories => {
                for story in results(value, &section_context)? {
                    ensure_valid_story(story, &section_context)?;
                }
            }
        }
    }
    Ok(())
}

fn results<'v>(section: &'v Value, context: &str) -> Result<&'v Vec<Value>, ValidationError> {
    require(section, "results", context)?
        .as_array()
        .ok_or_else(|| wrong_type(context, "results", "a list"))
}
