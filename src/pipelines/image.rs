use crate::error::{NutritionError, ProviderError};
use crate::images_to_text::{GoogleVisionOcr, ImageSource};
use crate::model::NutrientRecord;
use crate::providers::{NutrientProvider, NutrientQuery};
use crate::recognition::FoodRecognizer;
use log::info;

/// OCR a photographed recipe and analyze the recognized text.
pub async fn process_recipe_image(
    image: &ImageSource,
    ocr: &GoogleVisionOcr,
    provider: &dyn NutrientProvider,
    servings: u32,
) -> Result<NutrientRecord, NutritionError> {
    let text = ocr.extract_text(image).await?;
    info!("OCR extracted {} characters", text.len());
    super::text::process(&text, servings, provider).await
}

/// Recognize the food on a photo and look up its best label.
pub async fn process_food_photo(
    image: &ImageSource,
    recognizer: &dyn FoodRecognizer,
    provider: &dyn NutrientProvider,
) -> Result<NutrientRecord, NutritionError> {
    let base64_image = image.to_base64().await?;
    let concepts = recognizer.recognize(&base64_image).await?;

    let top = concepts.first().ok_or_else(|| {
        ProviderError::data_invalid(recognizer.recognizer_name(), "no prediction returned")
    })?;
    info!(
        "{} labeled the photo '{}' ({:.2})",
        recognizer.recognizer_name(),
        top.name,
        top.value
    );

    let query = NutrientQuery::FoodName(top.name.clone());
    super::query::process(&query, provider).await
}
