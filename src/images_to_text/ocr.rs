use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::providers::{http_client, resolve_api_key};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const NAME: &str = "google_vision";
const DEFAULT_BASE_URL: &str = "https://vision.googleapis.com";

/// Represents the source of an image for OCR or recognition
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image from a file path
    Path(String),
    /// Image as base64-encoded data
    Base64(String),
}

impl ImageSource {
    /// Base64 payload for the image, reading the file when needed.
    pub async fn to_base64(&self) -> Result<String, std::io::Error> {
        match self {
            ImageSource::Path(path) => {
                let image_data = tokio::fs::read(path).await?;
                Ok(STANDARD.encode(image_data))
            }
            ImageSource::Base64(data) => Ok(data.clone()),
        }
    }
}

/// Text extraction through the Google Cloud Vision `TEXT_DETECTION` feature
pub struct GoogleVisionOcr {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleVisionOcr {
    /// Create a new OCR client from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        if !config.enabled {
            return Err(ProviderError::unavailable(NAME, "not enabled in configuration"));
        }
        let api_key = resolve_api_key(config.api_key.as_ref(), "GOOGLE_API_KEY", NAME)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(GoogleVisionOcr {
            client: http_client(timeout),
            api_key,
            base_url,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        GoogleVisionOcr {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Extract the raw text from an image.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The image file cannot be read (`DataInvalid`)
    /// - The Vision API request fails (`Unavailable` / `QuotaExceeded`)
    /// - No text is detected in the image (`DataInvalid`)
    pub async fn extract_text(&self, source: &ImageSource) -> Result<String, ProviderError> {
        let base64_image = source.to_base64().await.map_err(|e| {
            ProviderError::data_invalid(NAME, format!("cannot read image: {}", e))
        })?;
        self.call_google_vision(&base64_image).await
    }

    async fn call_google_vision(&self, base64_image: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/images:annotate", self.base_url);

        let request_body = json!({
            "requests": [{
                "image": {
                    "content": base64_image
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }]
            }]
        });

        debug!("Sending OCR request to Google Vision API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Accept-Encoding", "identity")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(NAME, e))?;

        // Check for HTTP errors
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(NAME, status, &error_text));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::data_invalid(NAME, format!("invalid JSON: {}", e)))?;
        debug!("Google Vision API response: {:?}", response_body);

        // The API returns all detected text in the first annotation's description
        let text = response_body["responses"][0]["fullTextAnnotation"]["text"]
            .as_str()
            .ok_or_else(|| ProviderError::data_invalid(NAME, "no text found in image"))?;

        if text.trim().is_empty() {
            return Err(ProviderError::data_invalid(NAME, "no text detected in image"));
        }

        debug!("Extracted text from image: {} characters", text.len());

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_base64_source_passes_through() {
        let source = ImageSource::Base64("aGVsbG8=".to_string());
        assert_eq!(source.to_base64().await.unwrap(), "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_missing_file_is_data_invalid() {
        let ocr = GoogleVisionOcr::with_base_url("key".to_string(), "http://127.0.0.1:9".to_string());
        let source = ImageSource::Path("/definitely/not/here.jpg".to_string());
        let err = ocr.extract_text(&source).await.unwrap_err();
        assert!(matches!(err, ProviderError::DataInvalid { .. }));
    }

    #[test]
    fn test_ocr_requires_api_key() {
        // Clear the env var if it exists
        let original_key = std::env::var("GOOGLE_API_KEY").ok();
        std::env::remove_var("GOOGLE_API_KEY");

        let config = ProviderConfig {
            enabled: true,
            ..Default::default()
        };
        let result = GoogleVisionOcr::new(&config, Duration::from_secs(5));
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("GOOGLE_API_KEY"));
        }

        // Restore original key if it existed
        if let Some(key) = original_key {
            std::env::set_var("GOOGLE_API_KEY", key);
        }
    }

    #[test]
    fn test_disabled_ocr_is_refused() {
        let config = ProviderConfig {
            enabled: false,
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let err = GoogleVisionOcr::new(&config, Duration::from_secs(5)).err();
        assert_eq!(
            err,
            Some(ProviderError::unavailable(
                "google_vision",
                "not enabled in configuration"
            ))
        );
    }
}
