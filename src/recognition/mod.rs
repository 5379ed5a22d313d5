//! Food recognition collaborator: labels what is on a photo.

mod clarifai;

pub use clarifai::ClarifaiRecognizer;

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A label predicted for an image, with the model's confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodConcept {
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    fn recognizer_name(&self) -> &str;

    /// Predict food labels for a base64-encoded image, best match first.
    async fn recognize(&self, base64_image: &str) -> Result<Vec<FoodConcept>, ProviderError>;
}
