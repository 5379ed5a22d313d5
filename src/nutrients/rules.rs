//! Ordered nutrient-name classification rules.
//!
//! Rules are tried top to bottom against the lower-cased entry name and the
//! first hit decides what the entry becomes. Inside each family the more
//! specific rule comes first ("vitamin b12" before "vitamin b1", "trans fat"
//! before plain "fat").

/// Canonical nutrient fields a provider entry can land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutrientField {
    Calories,
    Protein,
    Carbohydrates,
    Fat,
    SaturatedFat,
    TransFat,
    Fiber,
    Sugar,
    Cholesterol,
    Sodium,
    VitaminA,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminK,
    VitaminB1,
    VitaminB2,
    VitaminB3,
    VitaminB6,
    VitaminB12,
    Folate,
    Calcium,
    Iron,
    Magnesium,
    Phosphorus,
    Potassium,
    Zinc,
    Copper,
    Manganese,
    Selenium,
}

/// One classification rule.
///
/// Matches when the name contains any of `any_of` and none of `none_of`.
/// A `target` of `None` claims the entry without storing it, which keeps
/// e.g. "Net Carbohydrates" or "Mono Unsaturated Fat" from falling through
/// to a later, broader rule.
#[derive(Debug, Clone, Copy)]
pub struct NutrientRule {
    pub any_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
    pub target: Option<NutrientField>,
}

impl NutrientRule {
    pub fn matches(&self, lowered_name: &str) -> bool {
        self.any_of.iter().any(|needle| lowered_name.contains(needle))
            && !self.none_of.iter().any(|needle| lowered_name.contains(needle))
    }
}

const fn rule(
    any_of: &'static [&'static str],
    none_of: &'static [&'static str],
    target: NutrientField,
) -> NutrientRule {
    NutrientRule {
        any_of,
        none_of,
        target: Some(target),
    }
}

const fn claim(any_of: &'static [&'static str]) -> NutrientRule {
    NutrientRule {
        any_of,
        none_of: &[],
        target: None,
    }
}

pub static NUTRIENT_RULES: &[NutrientRule] = &[
    // Energy
    rule(&["calorie", "energy"], &[], NutrientField::Calories),
    rule(&["protein"], &[], NutrientField::Protein),
    // Carbohydrates
    rule(&["carbohydrate", "carb"], &["net", "fiber"], NutrientField::Carbohydrates),
    claim(&["carbohydrate", "carb"]),
    // Fat family
    rule(
        &["trans fat", "trans-fat", "fatty acids, total trans"],
        &["monoenoic", "polyenoic", "dienoic"],
        NutrientField::TransFat,
    ),
    // Trans isomer breakdowns would otherwise land in plain fat
    claim(&["fatty acids, total trans"]),
    rule(&["saturated"], &["unsaturated"], NutrientField::SaturatedFat),
    rule(
        &["fat"],
        &["monounsaturated", "polyunsaturated", "unsaturated"],
        NutrientField::Fat,
    ),
    claim(&["fat"]),
    rule(&["fiber", "fibre"], &[], NutrientField::Fiber),
    rule(&["sugar"], &[], NutrientField::Sugar),
    rule(&["cholesterol"], &[], NutrientField::Cholesterol),
    rule(&["sodium"], &[], NutrientField::Sodium),
    // Vitamins
    rule(
        &["vitamin b12", "vitamin b-12", "cobalamin"],
        &[],
        NutrientField::VitaminB12,
    ),
    rule(&["vitamin b1", "thiamin"], &[], NutrientField::VitaminB1),
    rule(&["vitamin b2", "riboflavin"], &[], NutrientField::VitaminB2),
    rule(&["vitamin b3", "niacin"], &[], NutrientField::VitaminB3),
    rule(
        &["vitamin b6", "vitamin b-6", "pyridoxine"],
        &[],
        NutrientField::VitaminB6,
    ),
    rule(
        &["vitamin b9", "folate", "folic acid"],
        &[],
        NutrientField::Folate,
    ),
    rule(&["vitamin a", "retinol"], &[], NutrientField::VitaminA),
    rule(&["vitamin c", "ascorbic acid"], &[], NutrientField::VitaminC),
    rule(&["vitamin d"], &[], NutrientField::VitaminD),
    rule(&["vitamin e", "tocopherol"], &[], NutrientField::VitaminE),
    rule(&["vitamin k"], &[], NutrientField::VitaminK),
    // Minerals
    rule(&["calcium"], &[], NutrientField::Calcium),
    rule(&["iron"], &[], NutrientField::Iron),
    rule(&["magnesium"], &[], NutrientField::Magnesium),
    rule(&["phosphorus"], &[], NutrientField::Phosphorus),
    rule(&["potassium"], &[], NutrientField::Potassium),
    rule(&["zinc"], &[], NutrientField::Zinc),
    rule(&["copper"], &[], NutrientField::Copper),
    rule(&["manganese"], &[], NutrientField::Manganese),
    rule(&["selenium"], &[], NutrientField::Selenium),
];

/// Classify a provider nutrient name.
///
/// Returns `None` both for names no rule covers and for names a claiming
/// rule swallows on purpose.
pub fn classify(name: &str) -> Option<NutrientField> {
    let lowered = name.to_lowercase();
    NUTRIENT_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .and_then(|rule| rule.target)
}
