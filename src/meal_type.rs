//! Meal-type classification and the per-day grouping view.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Canonical meal categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealCategory {
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Snacks,
        MealCategory::Dinner,
    ];

    /// Display name as stored in the category table
    pub fn name(self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Snacks => "Snacks",
            MealCategory::Dinner => "Dinner",
        }
    }

    /// Lower-case stem searched for inside free-text meal names
    fn stem(self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Snacks => "snack",
            MealCategory::Dinner => "dinner",
        }
    }

    fn from_exact_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
    }

    fn from_substring(lowered: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| lowered.contains(category.stem()))
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Front-end spellings that differ from the stored category names.
const SYNONYMS: &[(&str, MealCategory)] = &[("snack", MealCategory::Snacks)];

/// Lookup of meal categories by their stored id
pub trait MealTypeStore {
    fn find_by_id(&self, id: i64) -> Option<MealCategory>;
}

/// Meal-type table held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryMealTypeStore {
    categories: HashMap<i64, MealCategory>,
}

impl InMemoryMealTypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual seed data: ids 1 to 4 in Breakfast, Lunch, Snacks, Dinner order.
    pub fn seeded() -> Self {
        MealCategory::ALL
            .into_iter()
            .zip(1..)
            .fold(Self::new(), |store, (category, id)| store.with(id, category))
    }

    pub fn with(mut self, id: i64, category: MealCategory) -> Self {
        self.categories.insert(id, category);
        self
    }
}

impl MealTypeStore for InMemoryMealTypeStore {
    fn find_by_id(&self, id: i64) -> Option<MealCategory> {
        self.categories.get(&id).copied()
    }
}

/// Resolve a meal category from an optional id and an optional name.
///
/// A non-blank name always wins and always resolves: synonyms first, then an
/// exact (case-insensitive) category name, then substring containment, and
/// finally `Snacks`. Only without a usable name is the id looked up, and an
/// unknown id yields `None`.
pub fn resolve(store: &dyn MealTypeStore, id: Option<i64>, name: Option<&str>) -> Option<MealCategory> {
    if let Some(category) = name.and_then(resolve_name) {
        return Some(category);
    }

    let category = id.and_then(|id| store.find_by_id(id));
    if category.is_none() {
        debug!("Meal type id {:?} did not resolve", id);
    }
    category
}

fn resolve_name(name: &str) -> Option<MealCategory> {
    let lowered = name.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let canonical = SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == lowered)
        .map(|(_, category)| *category)
        .or_else(|| MealCategory::from_exact_name(&lowered))
        .or_else(|| MealCategory::from_substring(&lowered))
        .unwrap_or(MealCategory::Snacks);

    Some(canonical)
}

/// A day's food log split by meal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealGroups<T> {
    pub breakfast: Vec<T>,
    pub lunch: Vec<T>,
    pub snacks: Vec<T>,
    pub dinner: Vec<T>,
}

impl<T> Default for MealGroups<T> {
    fn default() -> Self {
        MealGroups {
            breakfast: Vec::new(),
            lunch: Vec::new(),
            snacks: Vec::new(),
            dinner: Vec::new(),
        }
    }
}

impl<T> MealGroups<T> {
    fn bucket(&mut self, category: MealCategory) -> &mut Vec<T> {
        match category {
            MealCategory::Breakfast => &mut self.breakfast,
            MealCategory::Lunch => &mut self.lunch,
            MealCategory::Snacks => &mut self.snacks,
            MealCategory::Dinner => &mut self.dinner,
        }
    }
}

/// Group items by meal, keeping input order within each group.
///
/// Items without a category are filed under snacks.
pub fn group_by_meal<T, F>(items: impl IntoIterator<Item = T>, category_of: F) -> MealGroups<T>
where
    F: Fn(&T) -> Option<MealCategory>,
{
    let mut groups = MealGroups::default();
    for item in items {
        let category = category_of(&item).unwrap_or(MealCategory::Snacks);
        groups.bucket(category).push(item);
    }
    groups
}
