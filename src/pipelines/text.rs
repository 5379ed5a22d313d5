use crate::error::NutritionError;
use crate::ingredients;
use crate::model::NutrientRecord;
use crate::providers::{NutrientProvider, NutrientQuery};
use log::debug;

/// Analyze free-form ingredient text as one recipe.
///
/// Fails with [`NutritionError::InsufficientText`] when no ingredient line
/// survives normalization, without calling the provider.
pub async fn process(
    text: &str,
    servings: u32,
    provider: &dyn NutrientProvider,
) -> Result<NutrientRecord, NutritionError> {
    let lines = ingredients::normalize(text);
    if lines.is_empty() {
        return Err(NutritionError::InsufficientText);
    }
    debug!("Ingredient lines:\n{}", ingredients::format_for_analysis(&lines));

    let query = NutrientQuery::Ingredients {
        lines,
        servings: servings.max(1),
    };
    super::query::process(&query, provider).await
}
