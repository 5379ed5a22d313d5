use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::providers::{http_client, resolve_api_key};
use crate::recognition::{FoodConcept, FoodRecognizer};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const NAME: &str = "clarifai";
const DEFAULT_BASE_URL: &str = "https://api.clarifai.com";
const DEFAULT_MODEL_ID: &str = "food-item-v1-recognition";
const DEFAULT_APP_ID: &str = "main";
const DEFAULT_USER_ID: &str = "clarifai";

pub struct ClarifaiRecognizer {
    client: Client,
    pat: String,
    base_url: String,
    model_id: String,
    app_id: String,
    user_id: String,
}

impl ClarifaiRecognizer {
    /// Create a new recognizer from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        if !config.enabled {
            return Err(ProviderError::unavailable(NAME, "not enabled in configuration"));
        }
        let pat = resolve_api_key(config.api_key.as_ref(), "CLARIFAI_PAT", NAME)?;

        Ok(ClarifaiRecognizer {
            client: http_client(timeout),
            pat,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model_id: config
                .model_id
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            app_id: config
                .app_id
                .clone()
                .unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            user_id: config
                .user_id
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(pat: String, base_url: String) -> Self {
        ClarifaiRecognizer {
            client: Client::new(),
            pat,
            base_url,
            model_id: DEFAULT_MODEL_ID.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

fn concepts_from_response(body: &Value) -> Result<Vec<FoodConcept>, ProviderError> {
    let concepts: Vec<FoodConcept> = body["outputs"][0]["data"]["concepts"]
        .as_array()
        .map(|concepts| {
            concepts
                .iter()
                .filter_map(|concept| {
                    let name = concept["name"].as_str()?.trim();
                    (!name.is_empty()).then(|| FoodConcept {
                        name: name.to_string(),
                        value: concept["value"].as_f64().unwrap_or(0.0),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if concepts.is_empty() {
        return Err(ProviderError::data_invalid(NAME, "no prediction returned"));
    }
    Ok(concepts)
}

#[async_trait]
impl FoodRecognizer for ClarifaiRecognizer {
    fn recognizer_name(&self) -> &str {
        NAME
    }

    async fn recognize(&self, base64_image: &str) -> Result<Vec<FoodConcept>, ProviderError> {
        let url = format!("{}/v2/models/{}/outputs", self.base_url, self.model_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.pat))
            .json(&json!({
                "user_app_id": {
                    "user_id": self.user_id,
                    "app_id": self.app_id
                },
                "inputs": [{
                    "data": {
                        "image": {
                            "base64": base64_image
                        }
                    }
                }]
            }))
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
        debug!("Clarifai response: {:?}", body);

        let concepts = concepts_from_response(&body)?;
        info!(
            "Clarifai recognized '{}' ({:.2})",
            concepts[0].name, concepts[0].value
        );
        Ok(concepts)
    }
}
