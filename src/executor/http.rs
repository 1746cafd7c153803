//! HTTP executor implementation
//!
//! This module sends queries to the service over HTTP:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Posting JSON payloads with the api key attached
//! - Classifying transport and status failures into `ServiceError`
//! - Event detail queries, event search and URI lookups

use crate::config::Settings;
use crate::executor::{PageRequest, RemoteExecutor, ServiceError};
use crate::query::{
    EventQuery, EventResults, EventSearch, QuerySpec, EVENTS_ENDPOINT, EVENT_ENDPOINT,
    SUGGEST_CONCEPTS_ENDPOINT, SUGGEST_SOURCES_ENDPOINT,
};
use crate::{ConfigError, RegistryError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client from the settings
///
/// The user agent has the form `name/version (+contact)`.
///
/// # Example
///
/// ```no_run
/// use event_registry::config::Settings;
/// use event_registry::executor::build_http_client;
///
/// let client = build_http_client(&Settings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &Settings) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.client.user_agent())
        .timeout(Duration::from_secs(settings.service.request_timeout_secs))
        .connect_timeout(Duration::from_secs(settings.service.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Executor that talks to the service over HTTP
///
/// No retries are attempted: every failure is returned to the caller.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpExecutor {
    /// Creates an executor from validated settings
    ///
    /// # Errors
    ///
    /// * `RegistryError::Settings` - the base url does not parse
    /// * `RegistryError::Service` - the HTTP client could not be built
    pub fn new(settings: &Settings) -> Result<Self> {
        let base = Url::parse(&settings.service.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        let client = build_http_client(settings).map_err(|source| ServiceError::Http {
            url: base.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            api_key: settings.service.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs a detail query against one or more events
    pub async fn exec_event_query(&self, query: &EventQuery) -> Result<EventResults> {
        let response = self.post(EVENT_ENDPOINT, query.to_payload()).await?;
        EventResults::from_response(&response)
    }

    /// Searches events and returns their URIs in service order
    pub async fn find_events(&self, search: &EventSearch) -> Result<Vec<String>> {
        let response = self.post(EVENTS_ENDPOINT, search.to_payload()).await?;
        EventSearch::parse_uris(&response)
    }

    /// Looks up the concept URI best matching a label
    pub async fn concept_uri(&self, label: &str, lang: &str) -> Result<Option<String>> {
        let response = self
            .post(
                SUGGEST_CONCEPTS_ENDPOINT,
                json!({ "prefix": label, "lang": lang }),
            )
            .await?;
        first_uri(&response, "concept suggestions")
    }

    /// Looks up the news source URI best matching a name
    pub async fn source_uri(&self, name: &str) -> Result<Option<String>> {
        let response = self
            .post(SUGGEST_SOURCES_ENDPOINT, json!({ "prefix": name }))
            .await?;
        first_uri(&response, "source suggestions")
    }

    /// Posts a JSON body and returns the decoded JSON response
    async fn post(&self, path: &str, mut body: Value) -> std::result::Result<Value, ServiceError> {
        let url = format!("{}{}", self.base_url, path);

        if let (Some(key), Value::Object(map)) = (&self.api_key, &mut body) {
            map.insert("apiKey".to_string(), Value::String(key.clone()));
        }

        tracing::trace!("POST {} {}", url, body);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport_error(&url, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServiceError::Unauthorized { url });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ServiceError::RateLimited { url });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&url, e))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| ServiceError::InvalidBody {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(ServiceError::Api(message.to_string()));
        }

        Ok(value)
    }
}

#[async_trait]
impl RemoteExecutor for HttpExecutor {
    async fn execute(
        &self,
        spec: &QuerySpec,
        page: PageRequest,
    ) -> std::result::Result<Value, ServiceError> {
        self.post(spec.endpoint(), spec.to_payload(page)).await
    }
}

fn classify_transport_error(url: &str, e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout {
            url: url.to_string(),
        }
    } else {
        ServiceError::Http {
            url: url.to_string(),
            source: e,
        }
    }
}

/// Takes the `uri` of the first suggestion, if any
fn first_uri(response: &Value, context: &str) -> Result<Option<String>> {
    let suggestions = response
        .as_array()
        .ok_or_else(|| RegistryError::malformed(context, "expected a JSON array"))?;

    Ok(suggestions
        .first()
        .and_then(|s| s.get("uri"))
        .and_then(Value::as_str)
        .map(str::to_string))
}
