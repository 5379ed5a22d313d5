use crate::error::NutritionError;
use crate::model::NutrientRecord;
use crate::providers::{NutrientProvider, NutrientQuery};
use log::debug;

/// Look up a food name or recipe id and map the result to a record.
///
/// When the provider gives no title, the record is named after the query.
pub async fn process(
    query: &NutrientQuery,
    provider: &dyn NutrientProvider,
) -> Result<NutrientRecord, NutritionError> {
    let payload = provider.fetch_nutrients(query).await?;
    debug!(
        "{} returned {} nutrients for {}",
        provider.provider_name(),
        payload.entries.len(),
        query
    );

    let servings = match query {
        NutrientQuery::Ingredients { servings, .. } => Some(*servings),
        _ => None,
    };

    Ok(NutrientRecord::from_payload(
        &payload,
        &query.default_food_name(),
        servings,
    ))
}
