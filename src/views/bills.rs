//! Bills page: summary cards and the overdue / upcoming / paid lists.

use crate::aggregate::{aggregate, order_by_priority, GroupSummary, Reducers};
use crate::models::{Bill, BillCategory};
use crate::status::{Classification, DisplayStatus, UrgencyThreshold};
use crate::types::Cents;

use super::ViewContext;

/// Which bills the board lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub category: Option<BillCategory>,
    pub show_paid: bool,
}

impl BillFilter {
    fn accepts(&self, bill: &Bill) -> bool {
        self.category.map_or(true, |c| c == bill.category)
    }
}

/// A bill with its derived status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillRow<'a> {
    pub bill: &'a Bill,
    pub status: Classification,
}

/// Numbers for the summary cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillSummary {
    /// Sum over bills not yet paid or cancelled
    pub total_due: Cents,
    pub total_paid: Cents,
    pub overdue: usize,
    /// Unpaid bills due within the look-ahead window, today included
    pub due_soon: usize,
    /// Unpaid totals per category, in category order
    pub by_category: Vec<GroupSummary<BillCategory>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillsBoard<'a> {
    pub summary: BillSummary,
    pub overdue: Vec<BillRow<'a>>,
    pub upcoming: Vec<BillRow<'a>>,
    /// Paid and cancelled bills; empty unless the filter asks for them
    pub paid: Vec<BillRow<'a>>,
}

fn rows<'a>(
    bills: impl IntoIterator<Item = &'a Bill>,
    ctx: &ViewContext,
    threshold: UrgencyThreshold,
) -> Vec<BillRow<'a>> {
    bills
        .into_iter()
        .map(|bill| BillRow {
            bill,
            status: bill.classify(ctx.today, &ctx.zone, threshold),
        })
        .collect()
}

fn is_open(row: &BillRow<'_>) -> bool {
    !matches!(
        row.status.status,
        DisplayStatus::Completed | DisplayStatus::Cancelled
    )
}

/// Summary cards over every bill.
#[must_use]
pub fn summary(
    bills: &[Bill],
    ctx: &ViewContext,
    threshold: UrgencyThreshold,
    window_days: i64,
) -> BillSummary {
    summarize(&rows(bills, ctx, threshold), window_days)
}

fn summarize(classified: &[BillRow<'_>], window_days: i64) -> BillSummary {
    let by_status = aggregate(
        classified,
        |r| r.status.status,
        &Reducers::count().sum(|r: &BillRow<'_>| r.bill.amount.get()),
    );
    let amount_of = |status: DisplayStatus| by_status.get(&status).map_or(0, GroupSummary::amount);
    let count_of = |status: DisplayStatus| by_status.get(&status).map_or(0, |s| s.count);

    let total_due: i64 = [
        DisplayStatus::Overdue,
        DisplayStatus::DueToday,
        DisplayStatus::DueTomorrow,
        DisplayStatus::Upcoming,
    ]
    .into_iter()
    .map(amount_of)
    .sum();

    let by_category = order_by_priority(
        aggregate(
            classified,
            |r| r.bill.category,
            &Reducers::count().sum_where(is_open, |r: &BillRow<'_>| r.bill.amount.get()),
        ),
        BillCategory::all(),
    );

    BillSummary {
        total_due: Cents::new(total_due),
        total_paid: Cents::new(amount_of(DisplayStatus::Completed)),
        overdue: count_of(DisplayStatus::Overdue),
        due_soon: classified
            .iter()
            .filter(|r| r.status.due_within(window_days))
            .count(),
        by_category,
    }
}

/// The bills page.
///
/// The summary cards cover the same category as the lists.
#[must_use]
pub fn board<'a>(
    bills: &'a [Bill],
    filter: &BillFilter,
    ctx: &ViewContext,
    threshold: UrgencyThreshold,
    window_days: i64,
) -> BillsBoard<'a> {
    let classified = rows(bills.iter().filter(|b| filter.accepts(b)), ctx, threshold);
    let summary = summarize(&classified, window_days);

    let mut overdue = Vec::new();
    let mut upcoming = Vec::new();
    let mut paid = Vec::new();

    for row in classified {
        match row.status.status {
            DisplayStatus::Overdue => overdue.push(row),
            _ if is_open(&row) => upcoming.push(row),
            _ if filter.show_paid => paid.push(row),
            _ => {}
        }
    }

    let due = |r: &BillRow<'_>| ctx.zone.calendar_day(&r.bill.due_date);
    overdue.sort_by_key(due);
    upcoming.sort_by_key(due);
    paid.sort_by_key(|r| std::cmp::Reverse(due(r)));

    BillsBoard {
        summary,
        overdue,
        upcoming,
        paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::{ctx, from_json};

    fn bills() -> Vec<Bill> {
        from_json(
            r#"[
            {"id": "1", "name": "Power", "amount": 120.50, "dueDate": "2024-03-05",
             "category": "utilities", "status": "pending"},
            {"id": "2", "name": "Rent", "amount": 1800, "dueDate": "2024-03-10T00:00:00",
             "category": "housing", "status": "pending", "isRecurring": true},
            {"id": "3", "name": "Water", "amount": 40, "dueDate": "2024-03-16",
             "category": "utilities", "status": "upcoming"},
            {"id": "4", "name": "Streaming", "amount": 15.99, "dueDate": "2024-03-01",
             "category": "subscriptions", "status": "paid", "autopay": true},
            {"id": "5", "name": "Insurance", "amount": 300, "dueDate": "2024-04-01",
             "category": "insurance", "status": "pending"}
        ]"#,
        )
    }

    #[test]
    fn test_summary_cards() {
        let bills = bills();
        let summary = summary(&bills, &ctx(), UrgencyThreshold::BILLS, 7);
        assert_eq!(summary.total_due, Cents::new(12_050 + 180_000 + 4_000 + 30_000));
        assert_eq!(summary.total_paid, Cents::new(1_599));
        assert_eq!(summary.overdue, 1);
        // rent today and water in six days
        assert_eq!(summary.due_soon, 2);

        let keys: Vec<_> = summary.by_category.iter().map(|g| g.key).collect();
        assert_eq!(
            keys,
            vec![
                BillCategory::Utilities,
                BillCategory::Housing,
                BillCategory::Insurance,
                BillCategory::Subscriptions
            ]
        );
        assert_eq!(summary.by_category[0].amount(), 16_050);
        assert_eq!(summary.by_category[3].amount(), 0);
    }

    #[test]
    fn test_board_lists() {
        let bills = bills();
        let board = board(
            &bills,
            &BillFilter::default(),
            &ctx(),
            UrgencyThreshold::BILLS,
            7,
        );
        assert_eq!(board.overdue.len(), 1);
        assert_eq!(board.overdue[0].status.overdue_by.unwrap().get(), 5);
        let upcoming: Vec<_> = board.upcoming.iter().map(|r| r.bill.name.as_str()).collect();
        assert_eq!(upcoming, vec!["Rent", "Water", "Insurance"]);
        assert_eq!(board.upcoming[0].status.status, DisplayStatus::DueToday);
        assert!(board.paid.is_empty());
    }

    #[test]
    fn test_board_filters() {
        let bills = bills();
        let filter = BillFilter {
            category: Some(BillCategory::Subscriptions),
            show_paid: true,
        };
        let board = board(&bills, &filter, &ctx(), UrgencyThreshold::BILLS, 7);
        assert!(board.overdue.is_empty());
        assert!(board.upcoming.is_empty());
        assert_eq!(board.paid.len(), 1);
        assert_eq!(board.summary.overdue, 0);
        assert_eq!(board.summary.total_paid, Cents::new(1_599));
    }

    #[test]
    fn test_summary_follows_category_filter() {
        let bills = bills();
        let filter = BillFilter {
            category: Some(BillCategory::Housing),
            show_paid: false,
        };
        let board = board(&bills, &filter, &ctx(), UrgencyThreshold::BILLS, 7);
        assert_eq!(board.summary.total_due, Cents::new(180_000));
        assert_eq!(board.summary.overdue, 0);
        assert_eq!(board.summary.due_soon, 1);
        assert_eq!(board.upcoming.len(), 1);
        assert_eq!(board.summary.by_category.len(), 1);
    }

    #[test]
    fn test_cancelled_bills_are_not_due() {
        let mut bills = bills();
        bills.extend(from_json::<Bill>(
            r#"[{"id": "6", "name": "Gym", "amount": 50, "dueDate": "2024-03-12",
                 "category": "utilities", "status": "cancelled"}]"#,
        ));
        let summary = summary(&bills, &ctx(), UrgencyThreshold::BILLS, 7);
        assert_eq!(summary.total_due, Cents::new(12_050 + 180_000 + 4_000 + 30_000));
        let by_category: i64 = summary.by_category.iter().map(GroupSummary::amount).sum();
        assert_eq!(by_category, summary.total_due.get());
        assert_eq!(summary.by_category[0].count, 3);
    }
}
