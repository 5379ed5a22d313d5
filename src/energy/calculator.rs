//! Daily calorie target from a weight goal.
//!
//! BMR uses the Mifflin-St Jeor equation (Mifflin et al., 1990):
//! `BMR = 10 x weight_kg + 6.25 x height_cm - 5 x age + s`, where `s` is +5
//! for men and -161 otherwise. TDEE scales BMR by a fixed activity factor,
//! and the daily deficit spreads `7700 kcal/kg` of weight change over the
//! days left until the goal date.

use crate::energy::{ActivityLevel, Gender, UserProfileSnapshot};
use chrono::{Local, NaiveDate};
use log::debug;
use serde::Serialize;

/// Activity multipliers applied to BMR
pub const ACTIVITY_FACTORS: [(ActivityLevel, f64); 5] = [
    (ActivityLevel::Sedentary, 1.2),
    (ActivityLevel::LightlyActive, 1.375),
    (ActivityLevel::ModeratelyActive, 1.55),
    (ActivityLevel::Active, 1.725),
    (ActivityLevel::VeryActive, 1.9),
];

/// Approximate energy content of one kilogram of body fat
pub const KCAL_PER_KG: f64 = 7700.0;

/// No calorie target is ever set below this
pub const MIN_CALORIE_TARGET_KCAL: i64 = 1200;

/// A value that is either computed or could not be, for lack of profile data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "kcal", rename_all = "snake_case")]
pub enum Estimate {
    Computed(i64),
    InsufficientData,
}

impl Estimate {
    /// The value, with missing data reported as 0.
    pub fn kcal_or_zero(self) -> i64 {
        match self {
            Estimate::Computed(kcal) => kcal,
            Estimate::InsufficientData => 0,
        }
    }

    pub fn is_computed(self) -> bool {
        matches!(self, Estimate::Computed(_))
    }
}

/// Result of projecting a profile's weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub tdee: Estimate,
    pub daily_deficit: Estimate,
    pub calorie_target: Estimate,
    /// Whole days until the goal date, 0 when the date is today, past, or unset
    pub days_left: i64,
}

/// Flat integer form of [`GoalProjection`], with 0 standing in for
/// insufficient data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub tdee_kcal: i64,
    pub daily_deficit_kcal: i64,
    pub calorie_target_kcal: i64,
    pub days_left: i64,
}

impl GoalProjection {
    pub fn tdee_kcal(&self) -> i64 {
        self.tdee.kcal_or_zero()
    }

    pub fn daily_deficit_kcal(&self) -> i64 {
        self.daily_deficit.kcal_or_zero()
    }

    pub fn calorie_target_kcal(&self) -> i64 {
        self.calorie_target.kcal_or_zero()
    }

    pub fn summary(&self) -> GoalSummary {
        GoalSummary {
            tdee_kcal: self.tdee_kcal(),
            daily_deficit_kcal: self.daily_deficit_kcal(),
            calorie_target_kcal: self.calorie_target_kcal(),
            days_left: self.days_left,
        }
    }
}

/// Basal Metabolic Rate in kcal/day (Mifflin-St Jeor).
///
/// Only `Male` gets the +5 offset; `Female` and `Other` both use -161.
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let offset = match gender {
        Gender::Male => 5.0,
        Gender::Female | Gender::Other => -161.0,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + offset
}

/// Activity multiplier, defaulting to sedentary when unknown.
pub fn activity_factor(level: Option<ActivityLevel>) -> f64 {
    level
        .and_then(|level| {
            ACTIVITY_FACTORS
                .iter()
                .find(|(candidate, _)| *candidate == level)
                .map(|(_, factor)| *factor)
        })
        .unwrap_or(ACTIVITY_FACTORS[0].1)
}

/// Project the profile's goal as of today's local date.
pub fn project(profile: &UserProfileSnapshot) -> GoalProjection {
    project_on(profile, Local::now().date_naive())
}

/// Project the profile's goal as of `today`.
pub fn project_on(profile: &UserProfileSnapshot, today: NaiveDate) -> GoalProjection {
    let raw_days = profile.aimed_date.map(|aimed| (aimed - today).num_days());
    let days_left = raw_days.unwrap_or(0).max(0);

    let tdee = raw_tdee(profile);
    let daily_deficit = raw_daily_deficit(profile, raw_days);

    let calorie_target = tdee.map(|tdee| {
        let target = (tdee - daily_deficit.unwrap_or(0.0)).round() as i64;
        target.max(MIN_CALORIE_TARGET_KCAL)
    });

    debug!(
        "Goal projection: tdee={:?} deficit={:?} target={:?} days_left={}",
        tdee, daily_deficit, calorie_target, days_left
    );

    GoalProjection {
        tdee: estimate(tdee),
        daily_deficit: estimate(daily_deficit),
        calorie_target: calorie_target.map_or(Estimate::InsufficientData, Estimate::Computed),
        days_left,
    }
}

fn raw_tdee(profile: &UserProfileSnapshot) -> Option<f64> {
    let weight = profile.weight_kg?;
    let height = profile.height_cm?;
    let age = profile.age_years?;
    let gender = profile.gender?;

    let bmr = basal_metabolic_rate(weight, height, age, gender);
    Some(bmr * activity_factor(profile.activity_level))
}

/// Signed daily deficit; negative means the goal needs a surplus.
fn raw_daily_deficit(profile: &UserProfileSnapshot, raw_days: Option<i64>) -> Option<f64> {
    let weight = profile.weight_kg?;
    let aimed_weight = profile.aimed_weight_kg?;
    // Divisor is clamped separately from the reported days_left
    let divisor = raw_days?.max(1);

    let total_deficit = (weight - aimed_weight) * KCAL_PER_KG;
    Some(total_deficit / divisor as f64)
}

fn estimate(value: Option<f64>) -> Estimate {
    value.map_or(Estimate::InsufficientData, |kcal| {
        Estimate::Computed(kcal.round() as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn reference_profile() -> UserProfileSnapshot {
        UserProfileSnapshot {
            weight_kg: Some(80.0),
            height_cm: Some(180.0),
            age_years: Some(30),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Sedentary),
            aimed_weight_kg: Some(75.0),
            aimed_date: Some(today() + Duration::days(30)),
        }
    }

    #[test]
    fn test_bmr() {
        assert_eq!(basal_metabolic_rate(80.0, 180.0, 30, Gender::Male), 1980.0);
        assert_eq!(basal_metabolic_rate(60.0, 165.0, 25, Gender::Female), 1345.25);
        assert_eq!(
            basal_metabolic_rate(60.0, 165.0, 25, Gender::Other),
            basal_metabolic_rate(60.0, 165.0, 25, Gender::Female)
        );
    }

    #[test]
    fn test_activity_factor_table() {
        assert_eq!(activity_factor(Some(ActivityLevel::Sedentary)), 1.2);
        assert_eq!(activity_factor(Some(ActivityLevel::LightlyActive)), 1.375);
        assert_eq!(activity_factor(Some(ActivityLevel::ModeratelyActive)), 1.55);
        assert_eq!(activity_factor(Some(ActivityLevel::Active)), 1.725);
        assert_eq!(activity_factor(Some(ActivityLevel::VeryActive)), 1.9);
        assert_eq!(activity_factor(None), 1.2);
    }

    #[test]
    fn test_reference_projection() {
        let projection = project_on(&reference_profile(), today());

        assert_eq!(projection.tdee, Estimate::Computed(2376));
        assert_eq!(projection.daily_deficit, Estimate::Computed(1283));
        // 2376 - 1283.33 = 1093, raised to the floor
        assert_eq!(projection.calorie_target, Estimate::Computed(1200));
        assert_eq!(projection.days_left, 30);
    }

    #[test]
    fn test_target_above_floor() {
        let mut profile = reference_profile();
        profile.activity_level = Some(ActivityLevel::VeryActive);
        profile.aimed_date = Some(today() + Duration::days(100));

        let projection = project_on(&profile, today());
        // TDEE 1980 * 1.9 = 3762, deficit 38500 / 100 = 385
        assert_eq!(projection.tdee_kcal(), 3762);
        assert_eq!(projection.daily_deficit_kcal(), 385);
        assert_eq!(projection.calorie_target_kcal(), 3377);
    }

    #[test]
    fn test_missing_biometrics_report_zero() {
        for strip in 0..4 {
            let mut profile = reference_profile();
            match strip {
                0 => profile.weight_kg = None,
                1 => profile.height_cm = None,
                2 => profile.age_years = None,
                _ => profile.gender = None,
            }
            let projection = project_on(&profile, today());
            assert_eq!(projection.tdee, Estimate::InsufficientData);
            assert_eq!(projection.calorie_target, Estimate::InsufficientData);
            assert_eq!(projection.tdee_kcal(), 0);
            assert_eq!(projection.calorie_target_kcal(), 0);
        }
    }

    #[test]
    fn test_missing_goal_zeroes_deficit_only() {
        let mut profile = reference_profile();
        profile.aimed_weight_kg = None;

        let projection = project_on(&profile, today());
        assert_eq!(projection.daily_deficit, Estimate::InsufficientData);
        assert_eq!(projection.daily_deficit_kcal(), 0);
        assert_eq!(projection.calorie_target, Estimate::Computed(2376));

        let mut profile = reference_profile();
        profile.aimed_date = None;
        let projection = project_on(&profile, today());
        assert_eq!(projection.daily_deficit, Estimate::InsufficientData);
        assert_eq!(projection.days_left, 0);
    }

    #[test]
    fn test_past_goal_date() {
        let mut profile = reference_profile();
        profile.aimed_date = Some(today() - Duration::days(10));

        let projection = project_on(&profile, today());
        assert_eq!(projection.days_left, 0);
        // Divisor clamps to 1 day: the whole 38500 kcal lands on today
        assert_eq!(projection.daily_deficit, Estimate::Computed(38500));
        assert_eq!(projection.calorie_target, Estimate::Computed(1200));
    }

    #[test]
    fn test_goal_date_today() {
        let mut profile = reference_profile();
        profile.aimed_date = Some(today());

        let projection = project_on(&profile, today());
        assert_eq!(projection.days_left, 0);
        assert_eq!(projection.daily_deficit_kcal(), 38500);
    }

    #[test]
    fn test_weight_gain_goal_is_a_surplus() {
        let mut profile = reference_profile();
        profile.aimed_weight_kg = Some(82.0);
        profile.aimed_date = Some(today() + Duration::days(70));

        let projection = project_on(&profile, today());
        // -2 kg * 7700 / 70 = -220
        assert_eq!(projection.daily_deficit_kcal(), -220);
        assert_eq!(projection.calorie_target_kcal(), 2596);
    }

    #[test]
    fn test_unknown_activity_defaults_to_sedentary() {
        let mut profile = reference_profile();
        profile.activity_level = None;
        assert_eq!(project_on(&profile, today()).tdee_kcal(), 2376);
    }

    #[test]
    fn test_summary_serialization() {
        let projection = project_on(&reference_profile(), today());
        let summary = serde_json::to_value(projection.summary()).unwrap();
        assert_eq!(
            summary,
            serde_json::json!({
                "tdeeKcal": 2376,
                "dailyDeficitKcal": 1283,
                "calorieTargetKcal": 1200,
                "daysLeft": 30
            })
        );

        let tagged = serde_json::to_value(projection).unwrap();
        assert_eq!(tagged["tdee"]["status"], "computed");
        assert_eq!(tagged["tdee"]["kcal"], 2376);
        assert_eq!(tagged["daysLeft"], 30);
    }

    #[test]
    fn test_insufficient_data_serialization() {
        let projection = project_on(&UserProfileSnapshot::default(), today());
        let tagged = serde_json::to_value(projection).unwrap();
        assert_eq!(tagged["tdee"], serde_json::json!({"status": "insufficient_data"}));
        assert_eq!(projection.summary().calorie_target_kcal, 0);
    }
}
