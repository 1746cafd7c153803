use crate::config::types::{ClientConfig, PagingConfig, ServiceConfig, Settings, MAX_PAGE_SIZE};
use crate::ConfigError;
use url::Url;

/// Validates the entire settings tree
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_service_config(&settings.service)?;
    validate_client_config(&settings.client)?;
    validate_paging_config(&settings.paging)?;
    Ok(())
}

fn validate_service_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if matches!(config.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "api-key cannot be blank; omit it instead".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client-name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    if config.client_version.is_empty() {
        return Err(ConfigError::Validation(
            "client-version cannot be empty".to_string(),
        ));
    }

    validate_email(&config.contact_email)
}

fn validate_paging_config(config: &PagingConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut service = ServiceConfig::default();
        service.base_url = "ftp://eventregistry.org".to_string();
        assert!(matches!(
            validate_service_config(&service),
            Err(ConfigError::InvalidUrl(_))
        ));

        service.base_url = "not a url".to_string();
        assert!(validate_service_config(&service).is_err());

        service.base_url = "http://127.0.0.1:8080".to_string();
        assert!(validate_service_config(&service).is_ok());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let mut service = ServiceConfig::default();
        service.api_key = Some("  ".to_string());
        assert!(validate_service_config(&service).is_err());
    }

    #[test]
    fn test_validate_page_size_bounds() {
        assert!(validate_paging_config(&PagingConfig { page_size: 1 }).is_ok());
        assert!(validate_paging_config(&PagingConfig { page_size: 100 }).is_ok());
        assert!(validate_paging_config(&PagingConfig { page_size: 0 }).is_err());
        assert!(validate_paging_config(&PagingConfig { page_size: 101 }).is_err());
    }

    #[test]
    fn test_validate_client_name() {
        let mut client = ClientConfig::default();
        client.client_name = "bad name!".to_string();
        assert!(validate_client_config(&client).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }
}
