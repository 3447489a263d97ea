//! Configuration validation.

use super::defaults::MAX_CONCURRENT_LIMIT;
use super::types::{EnrichmentConfig, ExportConfig, OutputConfig, ServerConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for ExportConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.snapshot.is_none() {
            errors.extend(self.server.validate());
        } else if self.server.timeout_secs == 0 {
            errors.push(zero_timeout());
        }
        errors.extend(self.enrichment.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        match self.url.as_deref() {
            None | Some("") => errors.push(ConfigError {
                field: "server.url".to_string(),
                message: "Black Duck URL must be set (--blackduck-url or BLACKDUCK_URL)".to_string(),
            }),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                errors.push(ConfigError {
                    field: "server.url".to_string(),
                    message: format!("URL must start with http:// or https://, got '{url}'"),
                });
            }
            Some(_) => {}
        }

        if self.api_token.as_deref().is_none_or(str::is_empty) {
            errors.push(ConfigError {
                field: "server.api_token".to_string(),
                message: "API token must be set (--blackduck-api-token or BLACKDUCK_API_TOKEN)"
                    .to_string(),
            });
        }

        if self.timeout_secs == 0 {
            errors.push(zero_timeout());
        }

        errors
    }
}

impl Validatable for EnrichmentConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(1..=MAX_CONCURRENT_LIMIT).contains(&self.max_concurrent) {
            errors.push(ConfigError {
                field: "enrichment.max_concurrent".to_string(),
                message: format!(
                    "Max concurrent requests must be between 1 and {MAX_CONCURRENT_LIMIT}, got {}",
                    self.max_concurrent
                ),
            });
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_deref().and_then(std::path::Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError {
                    field: "output.file".to_string(),
                    message: format!("Parent directory does not exist: {}", parent.display()),
                });
            }
        }
        errors
    }
}

fn zero_timeout() -> ConfigError {
    ConfigError {
        field: "server.timeout_secs".to_string(),
        message: "Timeout must be at least 1 second".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn remote_config() -> ExportConfig {
        let mut config = ExportConfig::default();
        config.server.url = Some("https://hub.example.com".to_string());
        config.server.api_token = Some("token".to_string());
        config
    }

    #[test]
    fn test_remote_config_valid() {
        assert!(remote_config().is_valid());
    }

    #[test]
    fn test_missing_server_settings() {
        let errors = ExportConfig::default().validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"server.url"));
        assert!(fields.contains(&"server.api_token"));
    }

    #[test]
    fn test_snapshot_skips_server_settings() {
        let config = ExportConfig {
            snapshot: Some(PathBuf::from("snapshot.json")),
            ..Default::default()
        };
        assert!(config.is_valid());
    }

    #[test]
    fn test_bad_url_scheme() {
        let mut config = remote_config();
        config.server.url = Some("hub.example.com".to_string());
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("http"));
    }

    #[test]
    fn test_max_concurrent_bounds() {
        let mut config = remote_config();
        config.enrichment.max_concurrent = 0;
        assert!(!config.is_valid());
        config.enrichment.max_concurrent = 65;
        assert!(!config.is_valid());
        config.enrichment.max_concurrent = 64;
        assert!(config.is_valid());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = remote_config();
        config.server.timeout_secs = 0;
        let errors = config.validate();
        assert_eq!(errors[0].field, "server.timeout_secs");
    }

    #[test]
    fn test_output_parent_missing() {
        let mut config = remote_config();
        config.output.file = Some(PathBuf::from("/no/such/dir/out.json"));
        assert!(!config.is_valid());
    }
}
