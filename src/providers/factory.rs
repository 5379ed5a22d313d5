use crate::config::{AppConfig, ProviderConfig};
use crate::error::NutritionError;
use crate::providers::{NutrientProvider, SpoonacularProvider, UsdaProvider};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn NutrientProvider>, NutritionError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(NutritionError::BuilderError(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "spoonacular" => Ok(Box::new(SpoonacularProvider::new(config, timeout)?)),
            "usda" => Ok(Box::new(UsdaProvider::new(config, timeout)?)),
            _ => Err(NutritionError::BuilderError(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(
        config: &AppConfig,
    ) -> Result<Box<dyn NutrientProvider>, NutritionError> {
        let provider_name = &config.default_provider;
        Self::create(
            provider_name,
            &config.provider(provider_name),
            Duration::from_secs(config.timeout),
        )
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["spoonacular", "usda"]
    }
}
