//! Shopping list grouped by store category.

use crate::aggregate::{aggregate, count_by, order_by_priority, GroupSummary, Reducers};
use crate::models::{ShoppingCategory, ShoppingItem};

/// Items of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub summary: GroupSummary<ShoppingCategory>,
    pub items: Vec<&'a ShoppingItem>,
}

impl CategoryGroup<'_> {
    #[must_use]
    pub const fn category(&self) -> ShoppingCategory {
        self.summary.key
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingList<'a> {
    /// Non-empty categories in store-walk order
    pub groups: Vec<CategoryGroup<'a>>,
    pub unchecked: usize,
    pub checked: usize,
}

impl ShoppingList<'_> {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.unchecked + self.checked
    }
}

/// Group `items` by category in the fixed category order.
///
/// Checked items are left out unless `show_checked` is set; the counts
/// always cover the whole list.
#[must_use]
pub fn by_category(items: &[ShoppingItem], show_checked: bool) -> ShoppingList<'_> {
    let counts = count_by(items, |i| i.checked);

    let visible: Vec<&ShoppingItem> = items
        .iter()
        .filter(|i| show_checked || !i.checked)
        .collect();

    let summaries = order_by_priority(
        aggregate(
            visible.iter().copied(),
            |i| i.category,
            &Reducers::count().completed(|i: &ShoppingItem| i.checked),
        ),
        ShoppingCategory::all(),
    );

    let groups = summaries
        .into_iter()
        .map(|summary| CategoryGroup {
            items: visible
                .iter()
                .copied()
                .filter(|i| i.category == summary.key)
                .collect(),
            summary,
        })
        .collect();

    ShoppingList {
        groups,
        unchecked: counts.get(&false).copied().unwrap_or(0),
        checked: counts.get(&true).copied().unwrap_or(0),
    }
}
