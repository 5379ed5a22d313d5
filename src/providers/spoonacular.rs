use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::ingredients::format_for_analysis;
use crate::model::{ProviderPayload, RawNutrientEntry};
use crate::providers::{http_client, resolve_api_key, NutrientProvider, NutrientQuery};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;

const NAME: &str = "spoonacular";
const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

pub struct SpoonacularProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpoonacularProvider {
    /// Create a new Spoonacular provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), "SPOONACULAR_API_KEY", NAME)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(SpoonacularProvider {
            client: http_client(timeout),
            api_key,
            base_url,
        })
    }

    pub fn with_api_key(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        SpoonacularProvider {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ProviderError> {
        let response = request
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(NAME, status, &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::data_invalid(NAME, format!("invalid JSON: {}", e)))?;
        debug!("Spoonacular response: {:?}", body);
        Ok(body)
    }

    async fn search_by_name(&self, food_name: &str) -> Result<ProviderPayload, ProviderError> {
        let request = self
            .client
            .get(format!("{}/recipes/complexSearch", self.base_url))
            .query(&[
                ("query", food_name),
                ("number", "1"),
                ("addRecipeNutrition", "true"),
            ]);
        let body = self.send(request).await?;

        let recipe = body["results"]
            .as_array()
            .and_then(|results| results.first())
            .ok_or_else(|| {
                ProviderError::data_invalid(NAME, format!("no results found for food: {}", food_name))
            })?;

        payload_from_recipe(recipe, &format!("food: {}", food_name))
    }

    async fn recipe_by_id(&self, recipe_id: u64) -> Result<ProviderPayload, ProviderError> {
        let request = self
            .client
            .get(format!("{}/recipes/{}/information", self.base_url, recipe_id))
            .query(&[("includeNutrition", "true")]);
        let body = self.send(request).await?;

        payload_from_recipe(&body, &format!("recipe ID: {}", recipe_id))
    }

    async fn analyze(&self, ingredient_list: &str, servings: u32) -> Result<ProviderPayload, ProviderError> {
        if ingredient_list.trim().is_empty() {
            return Err(ProviderError::data_invalid(NAME, "ingredients cannot be empty"));
        }

        let request = self
            .client
            .post(format!("{}/recipes/analyze", self.base_url))
            .json(&json!({
                "ingredientList": ingredient_list,
                "servings": servings,
            }));
        let body = self.send(request).await?;

        payload_from_recipe(&body, "ingredient analysis")
    }
}

/// Pull title, servings and `nutrition.nutrients` out of a recipe object.
fn payload_from_recipe(recipe: &Value, subject: &str) -> Result<ProviderPayload, ProviderError> {
    let nutrition = &recipe["nutrition"];
    if !nutrition.is_object() {
        return Err(ProviderError::data_invalid(
            NAME,
            format!("no nutrition data found for {}", subject),
        ));
    }

    let nutrients = nutrition["nutrients"]
        .as_array()
        .filter(|nutrients| !nutrients.is_empty())
        .ok_or_else(|| {
            ProviderError::data_invalid(
                NAME,
                format!("no nutrients found in nutrition data for {}", subject),
            )
        })?;

    let entries: Vec<RawNutrientEntry> = nutrients
        .iter()
        .map(|nutrient| RawNutrientEntry::from_values(&nutrient["name"], &nutrient["amount"]))
        .collect();

    Ok(ProviderPayload {
        food_name: recipe["title"].as_str().map(String::from),
        servings: recipe["servings"]
            .as_u64()
            .and_then(|servings| u32::try_from(servings).ok()),
        entries,
    })
}

#[async_trait]
impl NutrientProvider for SpoonacularProvider {
    fn provider_name(&self) -> &str {
        NAME
    }

    fn supports(&self, _query: &NutrientQuery) -> bool {
        true
    }

    async fn fetch_nutrients(&self, query: &NutrientQuery) -> Result<ProviderPayload, ProviderError> {
        let payload = match query {
            NutrientQuery::FoodName(name) => self.search_by_name(name).await?,
            NutrientQuery::RecipeId(id) => self.recipe_by_id(*id).await?,
            NutrientQuery::Ingredients { lines, servings } => {
                self.analyze(&format_for_analysis(lines), *servings).await?
            }
        };

        info!(
            "Spoonacular returned {} nutrients for {}",
            payload.entries.len(),
            query
        );
        Ok(payload)
    }
}
