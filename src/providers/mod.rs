mod factory;
mod fallback;
mod spoonacular;
mod usda;

pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use spoonacular::SpoonacularProvider;
pub use usda::UsdaProvider;

use crate::error::ProviderError;
use crate::ingredients::IngredientLine;
use crate::model::ProviderPayload;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// What to look up
#[derive(Debug, Clone, PartialEq)]
pub enum NutrientQuery {
    /// A food or dish name, e.g. a label from image recognition
    FoodName(String),
    /// A provider-side recipe or food id
    RecipeId(u64),
    /// A list of ingredient lines to analyze as one recipe
    Ingredients {
        lines: Vec<IngredientLine>,
        servings: u32,
    },
}

impl NutrientQuery {
    /// Name to fall back on when the provider does not return a title.
    pub fn default_food_name(&self) -> String {
        match self {
            NutrientQuery::FoodName(name) => name.clone(),
            NutrientQuery::RecipeId(id) => format!("Recipe {}", id),
            NutrientQuery::Ingredients { .. } => "Custom Recipe".to_string(),
        }
    }
}

impl fmt::Display for NutrientQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientQuery::FoodName(name) => write!(f, "food '{}'", name),
            NutrientQuery::RecipeId(id) => write!(f, "recipe {}", id),
            NutrientQuery::Ingredients { lines, servings } => write!(
                f,
                "{} ingredient lines ({} servings)",
                lines.len(),
                servings
            ),
        }
    }
}

/// Unified trait for all nutrition data providers
#[async_trait]
pub trait NutrientProvider: Send + Sync {
    /// Get the provider name (e.g., "spoonacular", "usda")
    fn provider_name(&self) -> &str;

    /// Whether this provider can answer the given kind of query
    fn supports(&self, query: &NutrientQuery) -> bool;

    /// Fetch the provider's raw nutrient entries for a query
    async fn fetch_nutrients(&self, query: &NutrientQuery)
        -> Result<ProviderPayload, ProviderError>;
}

/// Build an HTTP client with the configured request timeout.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Resolve an API key from config, then from an environment variable.
pub(crate) fn resolve_api_key(
    configured: Option<&String>,
    env_var: &str,
    provider: &str,
) -> Result<String, ProviderError> {
    configured
        .cloned()
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::unavailable(
                provider,
                format!("{} not found in config or environment", env_var),
            )
        })
}
