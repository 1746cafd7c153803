use serde::Deserialize;

/// Largest page the service accepts for article lists
pub const MAX_PAGE_SIZE: u32 = 100;

/// Main settings structure for the Event Registry client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub paging: PagingConfig,
}

/// Remote service connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service, without the `/api/v1` suffix
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// API key sent with every request
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Overall timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Client identification, used to build the User-Agent header
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "client-name")]
    pub client_name: String,

    #[serde(rename = "client-version")]
    pub client_version: String,

    /// Email address for service operators to reach the client owner
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Pagination defaults
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    /// Page size the command-line client sets on its queries
    ///
    /// The library does not read it: a `QuerySpec` without a page size pages
    /// by `MAX_PAGE_SIZE`.
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://eventregistry.org".to_string(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_name: env!("CARGO_PKG_NAME").to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_email: "maintainers@example.com".to_string(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl ClientConfig {
    /// Formats the User-Agent header: `name/version (+contact)`
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.client_name, self.client_version, self.contact_email
        )
    }
}
