use std::fmt;

use serde::{Deserialize, Serialize};

/// An entry on the shared shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: ShoppingCategory,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ItemSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<ItemPriority>,
}

const fn default_quantity() -> f64 {
    1.0
}

impl ShoppingItem {
    /// Quantity with unit, e.g. "2 lb" or "x3".
    #[must_use]
    pub fn quantity_label(&self) -> String {
        let qty = if self.quantity.fract() == 0.0 {
            format!("{:.0}", self.quantity)
        } else {
            format!("{}", self.quantity)
        };
        match &self.unit {
            Some(unit) => format!("{qty} {unit}"),
            None => format!("x{qty}"),
        }
    }
}

/// Body of an add-item request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShoppingItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: ShoppingCategory,
}

impl NewShoppingItem {
    #[must_use]
    pub fn new(name: impl Into<String>, category: ShoppingCategory) -> Self {
        Self {
            name: name.into(),
            quantity: default_quantity(),
            unit: None,
            category,
        }
    }
}

/// Aisle grouping for the shopping list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingCategory {
    Produce,
    Dairy,
    Meat,
    Bakery,
    Frozen,
    Pantry,
    Beverages,
    Snacks,
    Household,
    Personal,
    #[default]
    #[serde(other)]
    Other,
}

impl ShoppingCategory {
    /// Categories in store-walk order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Produce,
            Self::Dairy,
            Self::Meat,
            Self::Bakery,
            Self::Frozen,
            Self::Pantry,
            Self::Beverages,
            Self::Snacks,
            Self::Household,
            Self::Personal,
            Self::Other,
        ]
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Produce => "Produce",
            Self::Dairy => "Dairy",
            Self::Meat => "Meat",
            Self::Bakery => "Bakery",
            Self::Frozen => "Frozen",
            Self::Pantry => "Pantry",
            Self::Beverages => "Beverages",
            Self::Snacks => "Snacks",
            Self::Household => "Household",
            Self::Personal => "Personal",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ShoppingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ShoppingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown shopping category '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemSource {
    Manual,
    MealPlan,
    Recurring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPriority {
    High,
    Normal,
    Low,
}
