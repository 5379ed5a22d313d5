use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Gender as recorded on the user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Parse a free-text gender. Blank input is `None`; anything that is not
    /// recognisably male or female is `Other`.
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        match lowered.as_str() {
            "" => None,
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => Some(Gender::Other),
        }
    }
}

/// Activity level, used to scale BMR to TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Parse a lifestyle name such as "Lightly Active", "lightly_active" or
    /// "LightlyActive". Unknown names are `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "lightlyactive" => Some(ActivityLevel::LightlyActive),
            "moderatelyactive" => Some(ActivityLevel::ModeratelyActive),
            "active" => Some(ActivityLevel::Active),
            "veryactive" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }
}

/// Read-only view of the biometrics the goal calculator needs.
///
/// Every field is optional because profiles are filled in gradually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileSnapshot {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub age_years: Option<u32>,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "lenient_activity")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub aimed_weight_kg: Option<f64>,
    #[serde(default)]
    pub aimed_date: Option<NaiveDate>,
}

fn lenient_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(Gender::parse))
}

fn lenient_activity<'de, D>(deserializer: D) -> Result<Option<ActivityLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(ActivityLevel::from_name))
}
