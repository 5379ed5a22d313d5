use crate::config::AppConfig;
use crate::error::{NutritionError, ProviderError};
use crate::model::ProviderPayload;
use crate::providers::{NutrientProvider, NutrientQuery, ProviderFactory};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

pub struct FallbackProvider {
    providers: Vec<Box<dyn NutrientProvider>>,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl FallbackProvider {
    /// Create a new fallback provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, NutritionError> {
        if !config.fallback.enabled {
            // If fallback is disabled, just use the default provider
            let default_provider = ProviderFactory::get_default_provider(config)?;
            return Ok(FallbackProvider {
                providers: vec![default_provider],
                retry_attempts: 1,
                retry_delay_ms: 0,
            });
        }

        let timeout = Duration::from_secs(config.timeout);
        let mut providers = Vec::new();

        // Create providers in fallback order
        for provider_name in &config.fallback.order {
            let provider_config = config.provider(provider_name);
            if !provider_config.enabled {
                debug!("Skipping disabled provider '{}'", provider_name);
                continue;
            }
            match ProviderFactory::create(provider_name, &provider_config, timeout) {
                Ok(provider) => {
                    info!("Added '{}' to fallback chain", provider_name);
                    providers.push(provider);
                }
                Err(e) => {
                    warn!("Failed to initialize provider '{}': {}", provider_name, e);
                }
            }
        }

        if providers.is_empty() {
            return Err(NutritionError::BuilderError(
                "No providers available in fallback configuration".to_string(),
            ));
        }

        Ok(FallbackProvider {
            providers,
            retry_attempts: config.fallback.retry_attempts.max(1),
            retry_delay_ms: config.fallback.retry_delay_ms,
        })
    }

    /// Chain already-built providers, e.g. ones pointed at test servers.
    pub fn from_providers(
        providers: Vec<Box<dyn NutrientProvider>>,
        retry_attempts: u32,
        retry_delay_ms: u64,
    ) -> Self {
        FallbackProvider {
            providers,
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
        }
    }

    /// Try a provider, retrying transient failures with a growing delay
    async fn try_provider_with_retry(
        &self,
        provider: &dyn NutrientProvider,
        query: &NutrientQuery,
    ) -> Result<ProviderPayload, ProviderError> {
        let mut attempt = 1;

        loop {
            debug!(
                "Fetching {} from {} (attempt {}/{})",
                query,
                provider.provider_name(),
                attempt,
                self.retry_attempts
            );

            let error = match provider.fetch_nutrients(query).await {
                Ok(payload) => return Ok(payload),
                Err(e) => e,
            };

            warn!(
                "Provider {} failed (attempt {}/{}): {}",
                provider.provider_name(),
                attempt,
                self.retry_attempts,
                error
            );

            if !error.is_retryable() || attempt >= self.retry_attempts {
                return Err(error);
            }

            let delay = Duration::from_millis(self.retry_delay_ms * u64::from(attempt));
            debug!("Waiting {:?} before retry", delay);
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl NutrientProvider for FallbackProvider {
    fn provider_name(&self) -> &str {
        "fallback"
    }

    fn supports(&self, query: &NutrientQuery) -> bool {
        self.providers.iter().any(|provider| provider.supports(query))
    }

    async fn fetch_nutrients(&self, query: &NutrientQuery) -> Result<ProviderPayload, ProviderError> {
        let mut last_error = None;

        for provider in &self.providers {
            if !provider.supports(query) {
                debug!("{} cannot answer {}, skipping", provider.provider_name(), query);
                continue;
            }
            match self.try_provider_with_retry(provider.as_ref(), query).await {
                Ok(payload) => return Ok(payload),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::data_invalid("fallback", format!("no configured provider supports {}", query))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallbackConfig, ProviderConfig};
    use crate::model::RawNutrientEntry;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct ScriptedProvider {
        name: &'static str,
        calls: Arc<AtomicU32>,
        failures_before_success: u32,
        failure: ProviderError,
        answers_ingredients: bool,
    }

    #[async_trait]
    impl NutrientProvider for ScriptedProvider {
        fn provider_name(&self) -> &str {
            self.name
        }

        fn supports(&self, query: &NutrientQuery) -> bool {
            self.answers_ingredients || !matches!(query, NutrientQuery::Ingredients { .. })
        }

        async fn fetch_nutrients(
            &self,
            _query: &NutrientQuery,
        ) -> Result<ProviderPayload, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures_before_success {
                return Err(self.failure.clone());
            }
            Ok(ProviderPayload {
                food_name: Some(self.name.to_string()),
                servings: None,
                entries: vec![RawNutrientEntry::new("Calories", 100.0)],
            })
        }
    }

    fn scripted(
        name: &'static str,
        failures_before_success: u32,
        failure: ProviderError,
    ) -> (Box<dyn NutrientProvider>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = ScriptedProvider {
            name,
            calls: calls.clone(),
            failures_before_success,
            failure,
            answers_ingredients: true,
        };
        (Box::new(provider), calls)
    }

    fn food() -> NutrientQuery {
        NutrientQuery::FoodName("pizza".to_string())
    }

    fn create_test_config_with_fallback() -> AppConfig {
        let mut providers = HashMap::new();
        providers.insert(
            "spoonacular".to_string(),
            ProviderConfig {
                enabled: true,
                api_key: Some("test-key".to_string()),
                ..Default::default()
            },
        );

        AppConfig {
            default_provider: "spoonacular".to_string(),
            providers,
            fallback: FallbackConfig {
                enabled: true,
                order: vec!["spoonacular".to_string()],
                retry_attempts: 3,
                retry_delay_ms: 100,
            },
            timeout: 30,
        }
    }

    #[test]
    fn test_fallback_provider_creation() {
        let config = create_test_config_with_fallback();
        let fallback = FallbackProvider::new(&config).unwrap();
        assert_eq!(fallback.provider_name(), "fallback");
        assert_eq!(fallback.providers.len(), 1);
    }

    #[test]
    fn test_fallback_disabled() {
        let mut config = create_test_config_with_fallback();
        config.fallback.enabled = false;

        let fallback = FallbackProvider::new(&config).unwrap();
        assert_eq!(fallback.providers.len(), 1);
        assert_eq!(fallback.retry_attempts, 1);
    }

    #[test]
    fn test_fallback_no_providers() {
        let mut config = create_test_config_with_fallback();
        config.providers.insert(
            "spoonacular".to_string(),
            ProviderConfig {
                enabled: false,
                ..Default::default()
            },
        );

        let result = FallbackProvider::new(&config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("No providers available"));
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let (provider, calls) = scripted("flaky", 2, ProviderError::unavailable("flaky", "timeout"));
        let fallback = FallbackProvider::from_providers(vec![provider], 3, 1);

        let payload = fallback.fetch_nutrients(&food()).await.unwrap();
        assert_eq!(payload.food_name.as_deref(), Some("flaky"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_quota_moves_to_next_provider_without_retry() {
        let (first, first_calls) = scripted("first", 10, ProviderError::quota_exceeded("first"));
        let (second, second_calls) = scripted("second", 0, ProviderError::quota_exceeded("second"));
        let fallback = FallbackProvider::from_providers(vec![first, second], 3, 1);

        let payload = fallback.fetch_nutrients(&food()).await.unwrap();
        assert_eq!(payload.food_name.as_deref(), Some("second"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failing_returns_last_error() {
        let (first, _) = scripted("first", 10, ProviderError::unavailable("first", "down"));
        let (second, _) = scripted("second", 10, ProviderError::data_invalid("second", "empty"));
        let fallback = FallbackProvider::from_providers(vec![first, second], 2, 1);

        let err = fallback.fetch_nutrients(&food()).await.unwrap_err();
        assert_eq!(err, ProviderError::data_invalid("second", "empty"));
    }

    #[tokio::test]
    async fn test_skips_providers_that_cannot_answer() {
        let calls = Arc::new(AtomicU32::new(0));
        let lookup_only = Box::new(ScriptedProvider {
            name: "lookup-only",
            calls: calls.clone(),
            failures_before_success: 0,
            failure: ProviderError::unavailable("lookup-only", "unused"),
            answers_ingredients: false,
        });
        let fallback = FallbackProvider::from_providers(vec![lookup_only], 1, 0);
        let query = NutrientQuery::Ingredients {
            lines: Vec::new(),
            servings: 1,
        };

        assert!(!fallback.supports(&query));
        let err = fallback.fetch_nutrients(&query).await.unwrap_err();
        assert!(err.to_string().contains("no configured provider supports"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
