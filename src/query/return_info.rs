//! Return-info descriptors: which optional fields the service should
//! populate on returned records

use serde_json::{Map, Value};

/// Optional article fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInfoFlags {
    /// Body length in characters; -1 returns the full body
    pub body_len: i32,
    pub concepts: bool,
    pub categories: bool,
    pub image: bool,
    pub links: bool,
    pub social_score: bool,
    pub location: bool,
}

impl Default for ArticleInfoFlags {
    fn default() -> Self {
        Self {
            body_len: -1,
            concepts: false,
            categories: false,
            image: false,
            links: false,
            social_score: false,
            location: false,
        }
    }
}

/// Optional event fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInfoFlags {
    pub concepts: bool,
    pub categories: bool,
    pub summary: bool,
    pub location: bool,
}

/// Combined return-info descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnInfo {
    pub article: ArticleInfoFlags,
    pub event: EventInfoFlags,
}

impl ReturnInfo {
    /// Everything the validators know how to check
    pub fn detailed() -> Self {
        Self {
            article: ArticleInfoFlags {
                body_len: -1,
                concepts: true,
                categories: true,
                image: true,
                links: false,
                social_score: false,
                location: true,
            },
            event: EventInfoFlags {
                concepts: true,
                categories: true,
                summary: true,
                location: true,
            },
        }
    }

    /// Writes the `includeArticle*` / `includeEvent*` flags into a request body
    ///
    /// Only flags that differ from the service defaults are emitted.
    pub fn apply(&self, body: &mut Map<String, Value>) {
        let a = &self.article;
        body.insert("articleBodyLen".into(), a.body_len.into());
        for (key, on) in [
            ("includeArticleConcepts", a.concepts),
            ("includeArticleCategories", a.categories),
            ("includeArticleImage", a.image),
            ("includeArticleLinks", a.links),
            ("includeArticleSocialScore", a.social_score),
            ("includeArticleLocation", a.location),
        ] {
            if on {
                body.insert(key.into(), Value::Bool(true));
            }
        }

        let e = &self.event;
        for (key, on) in [
            ("includeEventConcepts", e.concepts),
            ("includeEventCategories", e.categories),
            ("includeEventSummary", e.summary),
            ("includeEventLocation", e.location),
        ] {
            if on {
                body.insert(key.into(), Value::Bool(true));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_only_sets_body_len() {
        let mut body = Map::new();
        ReturnInfo::default().apply(&mut body);
        assert_eq!(body.len(), 1);
        assert_eq!(body["articleBodyLen"], -1);
    }

    #[test]
    fn test_detailed_flags() {
        let mut body = Map::new();
        ReturnInfo::detailed().apply(&mut body);
        assert_eq!(body["includeArticleConcepts"], true);
        assert_eq!(body["includeEventSummary"], true);
        assert!(!body.contains_key("includeArticleLinks"));
    }
}
