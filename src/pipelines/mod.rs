//! End-to-end flows from a raw source to a canonical [`NutrientRecord`].
//!
//! [`NutrientRecord`]: crate::model::NutrientRecord

pub mod image;
pub mod query;
pub mod text;
