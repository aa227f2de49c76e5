use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bucket::TimedRecord;
use crate::time::Timestamp;

/// One planned meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: String,
    pub date: Timestamp,
    pub meal_type: MealType,
    pub recipe: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

const fn default_servings() -> u32 {
    1
}

impl MealPlan {
    /// Prep plus cook minutes.
    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.prep_time.unwrap_or(0) + self.cook_time.unwrap_or(0)
    }
}

impl TimedRecord for MealPlan {
    fn timestamp(&self) -> &Timestamp {
        &self.date
    }

    fn all_day(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Meal slots in the order a day shows them.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack]
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
