use std::time::Duration;

use crate::config::AppConfig;
use crate::images_to_text::{GoogleVisionOcr, ImageSource};
use crate::pipelines;
use crate::providers::{FallbackProvider, NutrientProvider, NutrientQuery, ProviderFactory};
use crate::recognition::ClarifaiRecognizer;
use crate::{NutrientRecord, NutritionError};

/// Where the food to analyze comes from
#[derive(Debug, Clone)]
pub enum NutritionSource {
    /// Free-form ingredient text, analyzed as one recipe
    Text(String),
    /// A food or dish name to search for
    Food(String),
    /// A provider-side recipe id
    RecipeId(u64),
    /// A photographed recipe, OCR'd with Google Vision
    RecipeImage(ImageSource),
    /// A photo of a meal, labeled with Clarifai
    FoodPhoto(ImageSource),
}

/// Nutrient data provider to use instead of the configured chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientApi {
    Spoonacular,
    Usda,
}

impl NutrientApi {
    /// Convert to provider name string used by the factory
    fn as_str(&self) -> &str {
        match self {
            NutrientApi::Spoonacular => "spoonacular",
            NutrientApi::Usda => "usda",
        }
    }
}

/// Builder for configuring and executing nutrition imports
#[derive(Debug, Default)]
pub struct NutritionImporterBuilder {
    source: Option<NutritionSource>,
    servings: Option<u32>,
    provider: Option<NutrientApi>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    config: Option<AppConfig>,
}

impl NutritionImporterBuilder {
    /// Analyze free-form ingredient text
    ///
    /// # Example
    /// ```
    /// use nutrition_import::NutritionImporter;
    ///
    /// let builder = NutritionImporter::builder()
    ///     .text("2 cups flour\n3 eggs\n1 cup milk")
    ///     .servings(4);
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(NutritionSource::Text(text.into()));
        self
    }

    /// Look up a food by name
    pub fn food(mut self, name: impl Into<String>) -> Self {
        self.source = Some(NutritionSource::Food(name.into()));
        self
    }

    /// Look up a recipe by its provider id
    pub fn recipe_id(mut self, id: u64) -> Self {
        self.source = Some(NutritionSource::RecipeId(id));
        self
    }

    /// OCR a recipe photo, then analyze its ingredient text
    ///
    /// Requires a Google Vision key (`GOOGLE_API_KEY` or
    /// `providers.google_vision.api_key`).
    pub fn recipe_image(mut self, image: ImageSource) -> Self {
        self.source = Some(NutritionSource::RecipeImage(image));
        self
    }

    /// Recognize the food on a photo, then look it up by name
    ///
    /// Requires a Clarifai token (`CLARIFAI_PAT` or
    /// `providers.clarifai.api_key`).
    pub fn food_photo(mut self, image: ImageSource) -> Self {
        self.source = Some(NutritionSource::FoodPhoto(image));
        self
    }

    /// Number of servings the result describes
    pub fn servings(mut self, servings: u32) -> Self {
        self.servings = Some(servings);
        self
    }

    /// Use one specific nutrient provider instead of the configured chain
    ///
    /// # Example
    /// ```
    /// use nutrition_import::{NutrientApi, NutritionImporter};
    ///
    /// let builder = NutritionImporter::builder()
    ///     .food("banana")
    ///     .provider(NutrientApi::Usda);
    /// ```
    pub fn provider(mut self, provider: NutrientApi) -> Self {
        self.provider = Some(provider);
        self
    }

    /// API key for the nutrient provider
    ///
    /// Overrides config files and environment variables. Without an explicit
    /// [`provider`](Self::provider) the key goes to the default provider.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Use this configuration instead of loading `config.toml` and the
    /// environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build and execute the import
    ///
    /// # Errors
    /// Returns `NutritionError` if:
    /// - No source was specified, or the food name is blank
    /// - The text yields no ingredient lines
    /// - A provider, OCR or recognition call fails
    /// - Configuration cannot be loaded
    ///
    /// # Example
    /// ```no_run
    /// # use nutrition_import::NutritionImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let record = NutritionImporter::builder()
    ///     .food("margherita pizza")
    ///     .build()
    ///     .await?;
    /// println!("{} kcal", record.macros.calories);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<NutrientRecord, NutritionError> {
        let source = self.source.ok_or_else(|| {
            NutritionError::BuilderError(
                "No input source specified. Use .text(), .food(), .recipe_id(), .recipe_image() or .food_photo()"
                    .to_string(),
            )
        })?;

        if let NutritionSource::Food(name) = &source {
            if name.trim().is_empty() {
                return Err(NutritionError::BuilderError(
                    "Food name cannot be empty".to_string(),
                ));
            }
        }

        let mut config = self.config.map_or_else(AppConfig::load, Ok)?;
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs().max(1);
        }
        let timeout = Duration::from_secs(config.timeout);
        let provider = select_provider(&config, self.provider, self.api_key, timeout)?;
        let servings = self.servings.unwrap_or(1);

        match source {
            NutritionSource::Text(text) => {
                pipelines::text::process(&text, servings, provider.as_ref()).await
            }

            NutritionSource::Food(name) => {
                let query = NutrientQuery::FoodName(name.trim().to_string());
                let record = pipelines::query::process(&query, provider.as_ref()).await?;
                Ok(with_servings(record, self.servings))
            }

            NutritionSource::RecipeId(id) => {
                let query = NutrientQuery::RecipeId(id);
                let record = pipelines::query::process(&query, provider.as_ref()).await?;
                Ok(with_servings(record, self.servings))
            }

            NutritionSource::RecipeImage(image) => {
                let ocr = GoogleVisionOcr::new(&config.provider("google_vision"), timeout)?;
                pipelines::image::process_recipe_image(&image, &ocr, provider.as_ref(), servings)
                    .await
            }

            NutritionSource::FoodPhoto(image) => {
                let recognizer = ClarifaiRecognizer::new(&config.provider("clarifai"), timeout)?;
                let record =
                    pipelines::image::process_food_photo(&image, &recognizer, provider.as_ref())
                        .await?;
                Ok(with_servings(record, self.servings))
            }
        }
    }
}

/// An explicit provider or key picks a single provider; otherwise the
/// configured fallback chain answers.
fn select_provider(
    config: &AppConfig,
    provider: Option<NutrientApi>,
    api_key: Option<String>,
    timeout: Duration,
) -> Result<Box<dyn NutrientProvider>, NutritionError> {
    if provider.is_none() && api_key.is_none() {
        return Ok(Box::new(FallbackProvider::new(config)?));
    }

    let name = provider
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| config.default_provider.clone());
    let mut provider_config = config.provider(&name);
    if api_key.is_some() {
        provider_config.api_key = api_key;
    }
    ProviderFactory::create(&name, &provider_config, timeout)
}

fn with_servings(mut record: NutrientRecord, servings: Option<u32>) -> NutrientRecord {
    if let Some(servings) = servings {
        record.servings = servings.max(1);
    }
    record
}

/// Main entry point for the builder API
pub struct NutritionImporter;

impl NutritionImporter {
    /// Creates a new builder for importing nutrition data
    ///
    /// # Example
    /// ```
    /// use nutrition_import::NutritionImporter;
    ///
    /// let builder = NutritionImporter::builder();
    /// ```
    pub fn builder() -> NutritionImporterBuilder {
        NutritionImporterBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_names_match_factory() {
        for api in [NutrientApi::Spoonacular, NutrientApi::Usda] {
            assert!(ProviderFactory::available_providers().contains(&api.as_str()));
        }
    }

    #[tokio::test]
    async fn test_missing_source() {
        let result = NutritionImporter::builder()
            .config(AppConfig::default())
            .build()
            .await;
        assert!(matches!(result, Err(NutritionError::BuilderError(_))));
    }

    #[tokio::test]
    async fn test_blank_food_name() {
        let result = NutritionImporter::builder()
            .food("   ")
            .config(AppConfig::default())
            .build()
            .await;
        match result {
            Err(NutritionError::BuilderError(message)) => {
                assert_eq!(message, "Food name cannot be empty")
            }
            other => panic!("Expected BuilderError, got {:?}", other),
        }
    }

    #[test]
    fn test_with_servings_override() {
        let record = NutrientRecord::new("Soup", 4, Default::default());
        assert_eq!(with_servings(record.clone(), None).servings, 4);
        assert_eq!(with_servings(record.clone(), Some(2)).servings, 2);
        assert_eq!(with_servings(record, Some(0)).servings, 1);
    }
}
