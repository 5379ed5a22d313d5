//! USDA FoodData Central adapter.
//!
//! FoodData Central reports nutrients in two shapes: search results carry
//! flat `{nutrientName, value, unitName}` objects, while the food detail
//! endpoint nests the name as `{nutrient: {name, unitName}, amount}`. Both
//! are reduced to plain `{name, amount}` entries here.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::{ProviderPayload, RawNutrientEntry};
use crate::providers::{http_client, resolve_api_key, NutrientProvider, NutrientQuery};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

const NAME: &str = "usda";
const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

pub struct UsdaProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl UsdaProvider {
    /// Create a new USDA provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let api_key = resolve_api_key(config.api_key.as_ref(), "USDA_API_KEY", NAME)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(UsdaProvider {
            client: http_client(timeout),
            api_key,
            base_url,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        UsdaProvider {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ProviderError> {
        let response = request
            .query(&[("api_key", self.api_key.as_str())])
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
        debug!("USDA response: {:?}", body);
        Ok(body)
    }

    async fn search(&self, food_name: &str) -> Result<ProviderPayload, ProviderError> {
        let request = self
            .client
            .get(format!("{}/foods/search", self.base_url))
            .query(&[("query", food_name), ("pageSize", "1")]);
        let body = self.send(request).await?;

        let food = body["foods"]
            .as_array()
            .and_then(|foods| foods.first())
            .ok_or_else(|| {
                ProviderError::data_invalid(NAME, format!("no results found for food: {}", food_name))
            })?;

        payload_from_food(food)
    }

    async fn food_details(&self, fdc_id: u64) -> Result<ProviderPayload, ProviderError> {
        let request = self.client.get(format!("{}/food/{}", self.base_url, fdc_id));
        let body = self.send(request).await?;
        payload_from_food(&body)
    }
}

fn payload_from_food(food: &Value) -> Result<ProviderPayload, ProviderError> {
    let nutrients = food["foodNutrients"]
        .as_array()
        .filter(|nutrients| !nutrients.is_empty())
        .ok_or_else(|| ProviderError::data_invalid(NAME, "food has no nutrient data"))?;

    let entries = nutrients.iter().filter_map(entry_from_nutrient).collect();

    Ok(ProviderPayload {
        food_name: food["description"].as_str().map(String::from),
        servings: None,
        entries,
    })
}

fn entry_from_nutrient(nutrient: &Value) -> Option<RawNutrientEntry> {
    let (name, amount, unit) = if nutrient["nutrient"].is_object() {
        (
            &nutrient["nutrient"]["name"],
            &nutrient["amount"],
            &nutrient["nutrient"]["unitName"],
        )
    } else {
        (
            &nutrient["nutrientName"],
            &nutrient["value"],
            &nutrient["unitName"],
        )
    };

    // Energy is listed twice, once in kcal and once in kJ
    if unit
        .as_str()
        .is_some_and(|unit| unit.eq_ignore_ascii_case("kj"))
    {
        return None;
    }

    Some(RawNutrientEntry::from_values(name, amount))
}

#[async_trait]
impl NutrientProvider for UsdaProvider {
    fn provider_name(&self) -> &str {
        NAME
    }

    fn supports(&self, query: &NutrientQuery) -> bool {
        !matches!(query, NutrientQuery::Ingredients { .. })
    }

    async fn fetch_nutrients(&self, query: &NutrientQuery) -> Result<ProviderPayload, ProviderError> {
        let payload = match query {
            NutrientQuery::FoodName(name) => self.search(name).await?,
            NutrientQuery::RecipeId(fdc_id) => self.food_details(*fdc_id).await?,
            NutrientQuery::Ingredients { .. } => {
                return Err(ProviderError::data_invalid(
                    NAME,
                    "ingredient list analysis is not supported",
                ))
            }
        };

        info!("USDA returned {} nutrients for {}", payload.entries.len(), query);
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_shape() {
        let food = json!({
            "fdcId": 1750340,
            "description": "Apples, fuji, with skin, raw",
            "foodNutrients": [
                {"nutrientName": "Energy", "value": 58, "unitName": "KCAL"},
                {"nutrientName": "Energy", "value": 243, "unitName": "kJ"},
                {"nutrientName": "Protein", "value": 0.15, "unitName": "G"}
            ]
        });
        let payload = payload_from_food(&food).unwrap();
        assert_eq!(payload.food_name.as_deref(), Some("Apples, fuji, with skin, raw"));
        assert_eq!(
            payload.entries,
            vec![
                RawNutrientEntry::new("Energy", 58.0),
                RawNutrientEntry::new("Protein", 0.15),
            ]
        );
    }

    #[test]
    fn test_detail_shape() {
        let food = json!({
            "description": "Cheddar cheese",
            "foodNutrients": [
                {"nutrient": {"name": "Total lipid (fat)", "unitName": "g"}, "amount": 33.1},
                {"nutrient": {"name": "Calcium, Ca", "unitName": "mg"}}
            ]
        });
        let payload = payload_from_food(&food).unwrap();
        assert_eq!(payload.entries[0], RawNutrientEntry::new("Total lipid (fat)", 33.1));
        assert_eq!(payload.entries[1], RawNutrientEntry::new("Calcium, Ca", 0.0));
    }

    #[test]
    fn test_food_without_nutrients() {
        let err = payload_from_food(&json!({"description": "Water"})).unwrap_err();
        assert!(matches!(err, ProviderError::DataInvalid { .. }));
    }

    #[test]
    fn test_ingredient_queries_unsupported() {
        let provider = UsdaProvider::with_base_url("key".to_string(), "http://localhost".to_string());
        assert!(!provider.supports(&NutrientQuery::Ingredients {
            lines: Vec::new(),
            servings: 1
        }));
        assert!(provider.supports(&NutrientQuery::FoodName("apple".to_string())));
    }
}
