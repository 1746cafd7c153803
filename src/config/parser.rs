use crate::config::types::Settings;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to load, parse, or validate the settings
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    validate(&settings)?;
    Ok(settings)
}

/// Computes a SHA-256 hash of the settings file content
///
/// Logged at startup so runs against different settings can be told apart.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_settings_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads settings and returns both the settings and their hash
pub fn load_settings_with_hash(path: &Path) -> Result<(Settings, String), ConfigError> {
    let settings = load_settings(path)?;
    let hash = compute_settings_hash(path)?;
    Ok((settings, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_settings() {
        let content = r#"
[service]
base-url = "https://eventregistry.org"
api-key = "secret"
request-timeout-secs = 20

[client]
client-name = "er-tests"
client-version = "0.1"
contact-email = "dev@example.com"

[paging]
page-size = 50
"#;

        let file = create_temp_settings(content);
        let settings = load_settings(file.path()).unwrap();

        assert_eq!(settings.service.base_url, "https://eventregistry.org");
        assert_eq!(settings.service.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.service.request_timeout_secs, 20);
        assert_eq!(settings.service.connect_timeout_secs, 10);
        assert_eq!(settings.client.client_name, "er-tests");
        assert_eq!(settings.paging.page_size, 50);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = create_temp_settings("");
        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.paging.page_size, 100);
        assert!(settings.service.api_key.is_none());
    }

    #[test]
    fn test_load_settings_with_invalid_path() {
        let result = load_settings(Path::new("/nonexistent/registry.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_settings_with_invalid_toml() {
        let file = create_temp_settings("this is not valid TOML {{{");
        let result = load_settings(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_settings_with_validation_error() {
        let content = r#"
[paging]
page-size = 0
"#;
        let file = create_temp_settings(content);
        let result = load_settings(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_settings_hash() {
        let file = create_temp_settings("test content");

        let hash1 = compute_settings_hash(file.path()).unwrap();
        let hash2 = compute_settings_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_settings("content 1");
        let file2 = create_temp_settings("content 2");

        assert_ne!(
            compute_settings_hash(file1.path()).unwrap(),
            compute_settings_hash(file2.path()).unwrap()
        );
    }
}
