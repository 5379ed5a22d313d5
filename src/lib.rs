//! Nutrition import: turn ingredient text, food names, recipe ids and photos
//! into one canonical nutrient record, and project daily calorie targets
//! from a user's weight goal.
//!
//! # Example
//! ```no_run
//! # use nutrition_import::NutritionImporter;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = NutritionImporter::builder()
//!     .text("200g spaghetti\n2 eggs\n50g pecorino")
//!     .servings(2)
//!     .build()
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&record)?);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod energy;
pub mod error;
pub mod images_to_text;
pub mod ingredients;
pub mod meal_type;
pub mod model;
pub mod nutrients;
pub mod pipelines;
pub mod providers;
pub mod recognition;

pub use builder::{NutrientApi, NutritionImporter, NutritionImporterBuilder, NutritionSource};
pub use config::AppConfig;
pub use energy::{project, project_on, GoalProjection, UserProfileSnapshot};
pub use error::{NutritionError, ProviderError};
pub use images_to_text::ImageSource;
pub use ingredients::{normalize, IngredientLine};
pub use meal_type::{group_by_meal, resolve, MealCategory, MealGroups, MealTypeStore};
pub use model::{NutrientProfile, NutrientRecord, RawNutrientEntry};
pub use nutrients::extract;
pub use providers::{NutrientProvider, NutrientQuery};

/// Analyze ingredient text with the configured provider chain.
///
/// # Example
/// ```no_run
/// # use nutrition_import::analyze_text;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let record = analyze_text("1 cup rice, 200g chicken breast, 1 tbsp olive oil", 2).await?;
/// # Ok(())
/// # }
/// ```
pub async fn analyze_text(text: &str, servings: u32) -> Result<NutrientRecord, NutritionError> {
    NutritionImporter::builder()
        .text(text)
        .servings(servings)
        .build()
        .await
}

/// Look up a food by name with the configured provider chain.
pub async fn lookup_food(name: &str) -> Result<NutrientRecord, NutritionError> {
    NutritionImporter::builder().food(name).build().await
}

/// Look up a recipe by provider id with the configured provider chain.
pub async fn lookup_recipe(id: u64) -> Result<NutrientRecord, NutritionError> {
    NutritionImporter::builder().recipe_id(id).build().await
}

/// Analyze a photographed recipe: OCR, then ingredient analysis.
pub async fn analyze_recipe_image(
    image: ImageSource,
    servings: u32,
) -> Result<NutrientRecord, NutritionError> {
    NutritionImporter::builder()
        .recipe_image(image)
        .servings(servings)
        .build()
        .await
}

/// Recognize the food on a photo and look up its nutrients.
pub async fn analyze_food_photo(image: ImageSource) -> Result<NutrientRecord, NutritionError> {
    NutritionImporter::builder().food_photo(image).build().await
}
