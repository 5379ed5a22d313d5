//! Maps provider-specific nutrient lists onto the canonical schema.

mod rules;

pub use rules::{classify, NutrientField, NutrientRule, NUTRIENT_RULES};

use crate::error::NutritionError;
use crate::model::{round2, NutrientProfile, RawNutrientEntry};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Reduce raw provider entries to a canonical nutrient profile.
///
/// Each entry updates at most one field, chosen by the first matching rule
/// in [`NUTRIENT_RULES`]. Fields no entry maps to stay at `0.0`. When two
/// entries land in the same field the later one wins; that only happens when
/// a provider repeats a nutrient, so it is logged as a data-quality warning.
pub fn extract(entries: &[RawNutrientEntry]) -> NutrientProfile {
    let mut profile = NutrientProfile::default();
    let mut seen = HashSet::new();

    for entry in entries {
        let Some(field) = classify(&entry.name) else {
            debug!("Ignoring nutrient '{}'", entry.name);
            continue;
        };
        if !seen.insert(field) {
            warn!(
                "Nutrient {:?} reported more than once; '{}' = {} overrides the earlier value",
                field, entry.name, entry.amount
            );
        }
        set_field(&mut profile, field, round2(entry.amount));
    }

    profile
}

/// Extract from a provider's raw `nutrients` JSON value.
///
/// Fails only when the value is present but not an array; a missing value
/// (null) is treated as an empty list.
pub fn extract_from_value(nutrients: &Value) -> Result<NutrientProfile, NutritionError> {
    Ok(extract(&entries_from_value(nutrients)?))
}

/// Read `{name, amount}` entries out of a JSON array.
pub fn entries_from_value(nutrients: &Value) -> Result<Vec<RawNutrientEntry>, NutritionError> {
    match nutrients {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| RawNutrientEntry::from_values(&item["name"], &item["amount"]))
            .collect()),
        other => Err(NutritionError::MalformedEntries(format!(
            "expected an array of nutrients, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn set_field(profile: &mut NutrientProfile, field: NutrientField, amount: f64) {
    let macros = &mut profile.macros;
    let vitamins = &mut profile.vitamins;
    let minerals = &mut profile.minerals;

    match field {
        NutrientField::Calories => macros.calories = amount,
        NutrientField::Protein => macros.protein_g = amount,
        NutrientField::Carbohydrates => macros.carbohydrates_g = amount,
        NutrientField::Fat => macros.fat_g = amount,
        NutrientField::SaturatedFat => macros.saturated_fat_g = amount,
        NutrientField::TransFat => macros.trans_fat_g = amount,
        NutrientField::Fiber => macros.fiber_g = amount,
        NutrientField::Sugar => macros.sugar_g = amount,
        NutrientField::Cholesterol => macros.cholesterol_mg = amount,
        NutrientField::Sodium => {
            macros.sodium_mg = amount;
            minerals.sodium = amount;
        }
        NutrientField::VitaminA => vitamins.a = amount,
        NutrientField::VitaminC => vitamins.c = amount,
        NutrientField::VitaminD => vitamins.d = amount,
        NutrientField::VitaminE => vitamins.e = amount,
        NutrientField::VitaminK => vitamins.k = amount,
        NutrientField::VitaminB1 => vitamins.b1 = amount,
        NutrientField::VitaminB2 => vitamins.b2 = amount,
        NutrientField::VitaminB3 => vitamins.b3 = amount,
        NutrientField::VitaminB6 => vitamins.b6 = amount,
        NutrientField::VitaminB12 => vitamins.b12 = amount,
        NutrientField::Folate => vitamins.folate = amount,
        NutrientField::Calcium => minerals.calcium = amount,
        NutrientField::Iron => minerals.iron = amount,
        NutrientField::Magnesium => minerals.magnesium = amount,
        NutrientField::Phosphorus => minerals.phosphorus = amount,
        NutrientField::Potassium => minerals.potassium = amount,
        NutrientField::Zinc => minerals.zinc = amount,
        NutrientField::Copper => minerals.copper = amount,
        NutrientField::Manganese => minerals.manganese = amount,
        NutrientField::Selenium => minerals.selenium = amount,
    }
}
