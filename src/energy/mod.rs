//! Energy goal calculator: BMR, TDEE and the daily calorie target.

mod calculator;
mod profile;

pub use calculator::{
    activity_factor, basal_metabolic_rate, project, project_on, Estimate, GoalProjection,
    GoalSummary, ACTIVITY_FACTORS, KCAL_PER_KG, MIN_CALORIE_TARGET_KCAL,
};
pub use profile::{ActivityLevel, Gender, UserProfileSnapshot};
