//! Article, event and story validators

use crate::validate::{ValidationError, ValidationResult};
use chrono::NaiveDate;
use serde_json::Value;

/// Checks the fields every article carries
///
/// `uri`, `url`, `title` and `body` must be strings, `date` a `YYYY-MM-DD`
/// date, and `source` an object with a `uri`. `concepts`, when returned,
/// must be a list of objects with a `uri`.
pub fn ensure_valid_article(article: &Value, context: &str) -> ValidationResult {
    let context = format!("{} (article)", context);
    require_object(article, &context, "article")?;

    for field in ["uri", "url", "title", "body"] {
        require_str(article, field, &context)?;
    }
    require_date(article, "date", &context, false)?;

    let source = require(article, "source", &context)?;
    require_object(source, &context, "source")?;
    require_str(source, "uri", &context)?;

    if let Some(concepts) = article.get("concepts") {
        ensure_concept_list(concepts, &context)?;
    }
    Ok(())
}

/// Checks the fields every event carries
///
/// `uri` must be a string, `eventDate` empty or a `YYYY-MM-DD` date, and
/// `totalArticleCount` an integer. Concept and category lists are checked
/// when returned, and nested `articles.results` are validated as articles.
pub fn ensure_valid_event(event: &Value, context: &str) -> ValidationResult {
    let context = format!("{} (event)", context);
    require_object(event, &context, "event")?;

    require_str(event, "uri", &context)?;
    require_date(event, "eventDate", &context, true)?;
    if !require(event, "totalArticleCount", &context)?.is_u64() {
        return Err(wrong_type(&context, "totalArticleCount", "a non-negative integer"));
    }

    if let Some(concepts) = event.get("concepts") {
        ensure_concept_list(concepts, &context)?;
    }
    if let Some(categories) = event.get("categories") {
        if !categories.is_array() {
            return Err(wrong_type(&context, "categories", "a list"));
        }
    }

    if let Some(articles) = event.get("articles") {
        let results = articles
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| wrong_type(&context, "articles.results", "a list"))?;
        for article in results {
            ensure_valid_article(article, &context)?;
        }
    }
    Ok(())
}

/// Checks the fields every story carries
///
/// `uri` and `lang` must be strings; `concepts`, when returned, a concept list.
pub fn ensure_valid_story(story: &Value, context: &str) -> ValidationResult {
    let context = format!("{} (story)", context);
    require_object(story, &context, "story")?;

    require_str(story, "uri", &context)?;
    require_str(story, "lang", &context)?;

    if let Some(concepts) = story.get("concepts") {
        ensure_concept_list(concepts, &context)?;
    }
    Ok(())
}

fn ensure_concept_list(concepts: &Value, context: &str) -> ValidationResult {
    let list = concepts
        .as_array()
        .ok_or_else(|| wrong_type(context, "concepts", "a list"))?;
    for concept in list {
        require_str(concept, "uri", context)?;
    }
    Ok(())
}

pub(crate) fn require<'v>(
    value: &'v Value,
    field: &str,
    context: &str,
) -> Result<&'v Value, ValidationError> {
    value.get(field).ok_or_else(|| ValidationError::Missing {
        context: context.to_string(),
        field: field.to_string(),
    })
}

pub(crate) fn require_str<'v>(
    value: &'v Value,
    field: &str,
    context: &str,
) -> Result<&'v str, ValidationError> {
    require(value, field, context)?
        .as_str()
        .ok_or_else(|| wrong_type(context, field, "a string"))
}

pub(crate) fn require_object(value: &Value, context: &str, what: &str) -> ValidationResult {
    if value.is_object() {
        Ok(())
    } else {
        Err(wrong_type(context, what, "an object"))
    }
}

fn require_date(value: &Value, field: &str, context: &str, allow_empty: bool) -> ValidationResult {
    let date = require_str(value, field, context)?;
    if allow_empty && date.is_empty() {
        return Ok(());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| wrong_type(context, field, "a YYYY-MM-DD date"))
}

pub(crate) fn wrong_type(context: &str, field: &str, expected: &'static str) -> ValidationError {
    ValidationError::WrongType {
        context: context.to_string(),
        field: field.to_string(),
        expected,
    }
}
