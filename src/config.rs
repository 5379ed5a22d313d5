use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Nutrition provider to use when fallback is disabled
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for one external service
///
/// The same shape covers nutrition providers (`spoonacular`, `usda`), the
/// image recognizer (`clarifai`) and OCR (`google_vision`). Fields that a
/// service does not use are ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// API key or personal access token (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for proxies and tests)
    pub base_url: Option<String>,
    /// Recognition model identifier (Clarifai specific)
    pub model_id: Option<String>,
    /// Application id owning the model (Clarifai specific)
    pub app_id: Option<String>,
    /// User id owning the application (Clarifai specific)
    pub user_id: Option<String>,
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of attempts per provider before moving on
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base delay between retries in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            fallback: FallbackConfig::default(),
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "spoonacular".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with NUTRITION__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: NUTRITION__PROVIDERS__SPOONACULAR__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Look up a service, returning a default (enabled, env-keyed) entry when
    /// it is not configured at all.
    pub fn provider(&self, name: &str) -> ProviderConfig {
        self.providers.get(name).cloned().unwrap_or(ProviderConfig {
            enabled: true,
            ..Default::default()
        })
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for precedence.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: NUTRITION__PROVIDERS__USDA__API_KEY
        .add_source(
            Environment::with_prefix("NUTRITION")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "spoonacular");
        assert_eq!(default_retry_attempts(), 3);
        assert_eq!(default_retry_delay_ms(), 1000);
        assert_eq!(default_timeout(), 30);
    }

    #[test]
    fn test_fallback_config_default() {
        let fallback = FallbackConfig::default();
        assert!(!fallback.enabled);
        assert!(fallback.order.is_empty());
        assert_eq!(fallback.retry_attempts, 3);
        assert_eq!(fallback.retry_delay_ms, 1000);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            default_provider = "usda"
            timeout = 10

            [providers.usda]
            api_key = "usda-key"

            [providers.clarifai]
            enabled = false
            model_id = "food-item-v1-recognition"

            [fallback]
            enabled = true
            order = ["spoonacular", "usda"]
            retry_attempts = 2
        "#;

        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.default_provider, "usda");
        assert_eq!(config.timeout, 10);
        assert!(config.providers["usda"].enabled);
        assert_eq!(config.providers["usda"].api_key.as_deref(), Some("usda-key"));
        assert!(!config.providers["clarifai"].enabled);
        assert_eq!(config.fallback.order, vec!["spoonacular", "usda"]);
        assert_eq!(config.fallback.retry_attempts, 2);
        assert_eq!(config.fallback.retry_delay_ms, 1000);
    }

    #[test]
    fn test_missing_provider_defaults_to_enabled() {
        let config = AppConfig::default();
        let spoonacular = config.provider("spoonacular");
        assert!(spoonacular.enabled);
        assert!(spoonacular.api_key.is_none());
    }
}
