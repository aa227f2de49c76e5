//! Grouped summaries over record collections.
//!
//! One pass over the input, one [`GroupSummary`] per key present. The
//! result has no ordering; views that need a fixed order (shopping
//! categories, family members) apply [`order_by_priority`] afterwards.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts and sums for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary<K> {
    pub key: K,
    /// Records in the group
    pub count: usize,
    /// Sum of the amount accessor, when one was supplied
    pub total_amount: Option<i64>,
    /// Records accepted by the completion predicate, when one was supplied
    pub completed_count: Option<usize>,
}

impl<K> GroupSummary<K> {
    fn empty<T>(key: K, reducers: &Reducers<'_, T>) -> Self {
        Self {
            key,
            count: 0,
            total_amount: reducers.amount.as_ref().map(|_| 0),
            completed_count: reducers.completed.as_ref().map(|_| 0),
        }
    }

    /// Sum of amounts, zero when no accessor was supplied.
    #[must_use]
    pub fn amount(&self) -> i64 {
        self.total_amount.unwrap_or(0)
    }

    /// Completed records, zero when no predicate was supplied.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed_count.unwrap_or(0)
    }
}

type AmountFn<'f, T> = Box<dyn Fn(&T) -> i64 + 'f>;
type PredicateFn<'f, T> = Box<dyn Fn(&T) -> bool + 'f>;

/// What to compute per group besides the count.
pub struct Reducers<'f, T> {
    amount: Option<AmountFn<'f, T>>,
    sum_filter: Option<PredicateFn<'f, T>>,
    completed: Option<PredicateFn<'f, T>>,
}

impl<T> Default for Reducers<'_, T> {
    fn default() -> Self {
        Self::count()
    }
}

impl<'f, T> Reducers<'f, T> {
    /// Count only.
    #[must_use]
    pub fn count() -> Self {
        Self {
            amount: None,
            sum_filter: None,
            completed: None,
        }
    }

    /// Also sum `amount` over every record.
    #[must_use]
    pub fn sum(mut self, amount: impl Fn(&T) -> i64 + 'f) -> Self {
        self.amount = Some(Box::new(amount));
        self
    }

    /// Also sum `amount` over the records accepted by `filter`.
    #[must_use]
    pub fn sum_where(
        mut self,
        filter: impl Fn(&T) -> bool + 'f,
        amount: impl Fn(&T) -> i64 + 'f,
    ) -> Self {
        self.amount = Some(Box::new(amount));
        self.sum_filter = Some(Box::new(filter));
        self
    }

    /// Also count records accepted by `done`.
    #[must_use]
    pub fn completed(mut self, done: impl Fn(&T) -> bool + 'f) -> Self {
        self.completed = Some(Box::new(done));
        self
    }
}

/// Fold `records` into one summary per key.
pub fn aggregate<'r, T, K, I, F>(
    records: I,
    key_fn: F,
    reducers: &Reducers<'_, T>,
) -> HashMap<K, GroupSummary<K>>
where
    T: 'r,
    I: IntoIterator<Item = &'r T>,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, GroupSummary<K>> = HashMap::new();

    for record in records {
        let key = key_fn(record);
        let summary = groups
            .entry(key.clone())
            .or_insert_with(|| GroupSummary::empty(key, reducers));

        summary.count += 1;

        if let (Some(amount), Some(total)) = (&reducers.amount, summary.total_amount.as_mut()) {
            let counted = reducers.sum_filter.as_ref().map_or(true, |f| f(record));
            if counted {
                *total += amount(record);
            }
        }

        if let (Some(done), Some(completed)) =
            (&reducers.completed, summary.completed_count.as_mut())
        {
            if done(record) {
                *completed += 1;
            }
        }
    }

    groups
}

/// Count records per key.
pub fn count_by<'r, T, K, I, F>(records: I, key_fn: F) -> HashMap<K, usize>
where
    T: 'r,
    I: IntoIterator<Item = &'r T>,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    aggregate(records, key_fn, &Reducers::count())
        .into_iter()
        .map(|(k, s)| (k, s.count))
        .collect()
}

/// Reorder summaries by a known priority list.
///
/// Keys in `priority` come first in list order; any other keys follow,
/// sorted.
pub fn order_by_priority<K>(
    mut groups: HashMap<K, GroupSummary<K>>,
    priority: &[K],
) -> Vec<GroupSummary<K>>
where
    K: Eq + Hash + Ord + Clone,
{
    let mut ordered = Vec::with_capacity(groups.len());
    for key in priority {
        if let Some(summary) = groups.remove(key) {
            ordered.push(summary);
        }
    }

    let mut rest: Vec<GroupSummary<K>> = groups.into_values().collect();
    rest.sort_by(|a, b| a.key.cmp(&b.key));
    ordered.extend(rest);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chore {
        assigned_to: &'static str,
        completed: bool,
        points: i64,
    }

    fn chores() -> Vec<Chore> {
        vec![
            Chore {
                assigned_to: "Zoe",
                completed: true,
                points: 5,
            },
            Chore {
                assigned_to: "Zoe",
                completed: false,
                points: 3,
            },
            Chore {
                assigned_to: "Kyle",
                completed: true,
                points: 2,
            },
        ]
    }

    #[test]
    fn test_completed_points_per_assignee() {
        let chores = chores();
        let reducers = Reducers::count()
            .sum_where(|c: &Chore| c.completed, |c: &Chore| c.points)
            .completed(|c: &Chore| c.completed);
        let groups = aggregate(&chores, |c| c.assigned_to, &reducers);

        assert_eq!(groups.len(), 2);
        let zoe = &groups["Zoe"];
        assert_eq!(zoe.count, 2);
        assert_eq!(zoe.total_amount, Some(5));
        assert_eq!(zoe.completed_count, Some(1));
        let kyle = &groups["Kyle"];
        assert_eq!(kyle.count, 1);
        assert_eq!(kyle.total_amount, Some(2));
    }

    #[test]
    fn test_count_only_has_no_sums() {
        let chores = chores();
        let groups = aggregate(&chores, |c| c.assigned_to, &Reducers::count());
        assert_eq!(groups["Zoe"].count, 2);
        assert_eq!(groups["Zoe"].total_amount, None);
        assert_eq!(groups["Zoe"].completed_count, None);
        assert_eq!(groups["Zoe"].amount(), 0);
    }

    #[test]
    fn test_plain_sum() {
        let chores = chores();
        let reducers = Reducers::count().sum(|c: &Chore| c.points);
        let groups = aggregate(&chores, |c| c.assigned_to, &reducers);
        assert_eq!(groups["Zoe"].amount(), 8);
    }

    #[test]
    fn test_only_present_keys() {
        let empty: Vec<Chore> = Vec::new();
        assert!(aggregate(&empty, |c| c.assigned_to, &Reducers::count()).is_empty());
    }

    #[test]
    fn test_count_by() {
        let chores = chores();
        let counts = count_by(&chores, |c| c.completed);
        assert_eq!(counts[&true], 2);
        assert_eq!(counts[&false], 1);
    }

    #[test]
    fn test_order_by_priority() {
        let words = ["pantry", "zzz", "dairy", "produce", "aaa", "dairy"];
        let groups = aggregate(&words, |w| w.to_string(), &Reducers::count());
        let priority: Vec<String> = ["produce", "dairy", "pantry"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let keys: Vec<String> = order_by_priority(groups, &priority)
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["produce", "dairy", "pantry", "aaa", "zzz"]);
    }
}
