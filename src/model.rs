use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// One `{name, amount}` nutrient as emitted by a provider.
///
/// Amounts arrive as numbers, numeric strings, or null depending on the
/// provider; deserialization coerces all of them to a non-negative `f64`,
/// with anything unreadable becoming `0.0`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawNutrientEntry {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
}

impl RawNutrientEntry {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        RawNutrientEntry {
            name: name.into(),
            amount: sanitize_amount(amount),
        }
    }

    /// Build an entry from loosely typed JSON values.
    pub fn from_values(name: &Value, amount: &Value) -> Self {
        RawNutrientEntry {
            name: name.as_str().unwrap_or_default().to_string(),
            amount: coerce_amount(amount),
        }
    }
}

/// Coerce a JSON amount to a non-negative decimal; null and garbage become 0.
pub fn coerce_amount(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    sanitize_amount(raw)
}

fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

/// Round to the 2-decimal precision every canonical value is reported in.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Macronutrients plus the label items usually listed with them
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub calories: f64,
    pub protein_g: f64,
    pub carbohydrates_g: f64,
    pub fat_g: f64,
    pub saturated_fat_g: f64,
    pub trans_fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub cholesterol_mg: f64,
    pub sodium_mg: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitamins {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "K")]
    pub k: f64,
    #[serde(rename = "B1")]
    pub b1: f64,
    #[serde(rename = "B2")]
    pub b2: f64,
    #[serde(rename = "B3")]
    pub b3: f64,
    #[serde(rename = "B6")]
    pub b6: f64,
    #[serde(rename = "B12")]
    pub b12: f64,
    pub folate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Minerals {
    pub calcium: f64,
    pub iron: f64,
    pub magnesium: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub zinc: f64,
    pub copper: f64,
    pub manganese: f64,
    pub selenium: f64,
    /// Mirrors [`Macros::sodium_mg`]; sodium is one canonical field.
    pub sodium: f64,
}

/// Every canonical nutrient value, without the food name and servings.
///
/// This is what the field mapper produces; all fields start at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub macros: Macros,
    pub vitamins: Vitamins,
    pub minerals: Minerals,
}

/// What a provider adapter hands back for one lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderPayload {
    /// Title or description the provider gave the food, if any
    pub food_name: Option<String>,
    /// Serving count the provider reported, if any
    pub servings: Option<u32>,
    pub entries: Vec<RawNutrientEntry>,
}

/// Canonical nutrient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRecord {
    pub food_name: String,
    pub servings: u32,
    pub macros: Macros,
    pub vitamins: Vitamins,
    pub minerals: Minerals,
}

impl NutrientRecord {
    pub fn new(food_name: impl Into<String>, servings: u32, profile: NutrientProfile) -> Self {
        NutrientRecord {
            food_name: food_name.into(),
            servings: servings.max(1),
            macros: profile.macros,
            vitamins: profile.vitamins,
            minerals: profile.minerals,
        }
    }

    /// Build a record from a provider payload.
    ///
    /// The provider's title wins over `default_name`; an explicit `servings`
    /// wins over the provider's count, and the result is never below 1.
    pub fn from_payload(payload: &ProviderPayload, default_name: &str, servings: Option<u32>) -> Self {
        let profile = crate::nutrients::extract(&payload.entries);
        let food_name = payload
            .food_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(default_name);
        let servings = servings.or(payload.servings).unwrap_or(1);
        NutrientRecord::new(food_name, servings, profile)
    }

    pub fn profile(&self) -> NutrientProfile {
        NutrientProfile {
            macros: self.macros,
            vitamins: self.vitamins,
            minerals: self.minerals,
        }
    }

    /// Flat food-item shape used by the food log, which spells fat as `fats`.
    pub fn to_food_item_json(&self) -> Value {
        json!({
            "food_name": self.food_name,
            "servings": self.servings,
            "calories": self.macros.calories,
            "protein": self.macros.protein_g,
            "carbohydrates": self.macros.carbohydrates_g,
            "fats": self.macros.fat_g,
            "saturated_fat": self.macros.saturated_fat_g,
            "trans_fat": self.macros.trans_fat_g,
            "fiber": self.macros.fiber_g,
            "sugar": self.macros.sugar_g,
            "cholesterol": self.macros.cholesterol_mg,
            "sodium": self.macros.sodium_mg,
        })
    }
}
