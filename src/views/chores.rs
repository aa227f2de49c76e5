//! Chores page: per-member stats and chores grouped by status.

use crate::aggregate::{aggregate, Reducers};
use crate::models::Chore;
use crate::status::{Classification, DisplayStatus, UrgencyThreshold};
use crate::types::Points;

use super::{same_member, ViewContext};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoreFilter {
    /// Only chores assigned to this member
    pub member: Option<String>,
    pub show_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoreRow<'a> {
    pub chore: &'a Chore,
    pub status: Classification,
}

/// Completion stats for one assignee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStats {
    pub member: String,
    pub total: usize,
    pub completed: usize,
    /// Points from completed chores only
    pub points: Points,
}

impl MemberStats {
    /// Completed share in whole percent.
    #[must_use]
    pub fn percent_done(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation)]
        let pct = (self.completed * 100 / self.total) as u32;
        pct
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoresBoard<'a> {
    pub members: Vec<MemberStats>,
    /// Non-empty status groups in status order
    pub groups: Vec<(DisplayStatus, Vec<ChoreRow<'a>>)>,
}

/// Per-assignee totals, highest points first.
#[must_use]
pub fn member_stats(chores: &[Chore]) -> Vec<MemberStats> {
    let reducers = Reducers::count()
        .sum_where(Chore::is_completed, |c: &Chore| c.points().get())
        .completed(Chore::is_completed);

    let mut stats: Vec<MemberStats> = aggregate(chores, |c| c.assigned_to.clone(), &reducers)
        .into_values()
        .map(|g| MemberStats {
            total: g.count,
            completed: g.completed(),
            points: Points::new(g.amount()),
            member: g.key,
        })
        .collect();

    stats.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.member.cmp(&b.member)));
    stats
}

/// The chores page.
#[must_use]
pub fn board<'a>(
    chores: &'a [Chore],
    filter: &ChoreFilter,
    ctx: &ViewContext,
    threshold: UrgencyThreshold,
) -> ChoresBoard<'a> {
    let mut rows: Vec<ChoreRow<'a>> = chores
        .iter()
        .filter(|c| {
            filter
                .member
                .as_deref()
                .map_or(true, |m| same_member(m, &c.assigned_to))
        })
        .map(|chore| ChoreRow {
            chore,
            status: chore.classify(ctx.today, &ctx.zone, threshold),
        })
        .filter(|r| filter.show_completed || r.status.status != DisplayStatus::Completed)
        .collect();

    // undated chores sort last within their group
    rows.sort_by_key(|r| (r.status.days_until.is_none(), r.status.days_until));

    let groups = DisplayStatus::all()
        .iter()
        .filter_map(|&status| {
            let group: Vec<ChoreRow<'a>> =
                rows.iter().filter(|r| r.status.status == status).copied().collect();
            (!group.is_empty()).then_some((status, group))
        })
        .collect();

    ChoresBoard {
        members: member_stats(chores),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::{ctx, from_json};

    fn chores() -> Vec<Chore> {
        from_json(
            r#"[
            {"id": "1", "name": "Dishes", "assignedTo": "Zoe", "frequency": "daily",
             "status": "completed", "points": 5, "dueDate": "2024-03-10"},
            {"id": "2", "name": "Laundry", "assignedTo": "Zoe", "frequency": "weekly",
             "status": "pending", "points": 3, "dueDate": "2024-03-13"},
            {"id": "3", "name": "Trash", "assignedTo": "Kyle", "frequency": "weekly",
             "status": "completed", "points": 2},
            {"id": "4", "name": "Yard", "assignedTo": "Kyle", "frequency": "monthly",
             "status": "pending", "dueDate": "2024-03-08"},
            {"id": "5", "name": "Garage", "assignedTo": "kyle", "frequency": "once",
             "status": "pending"}
        ]"#,
        )
    }

    #[test]
    fn test_member_stats_count_completed_points_only() {
        let chores: Vec<Chore> = chores().into_iter().take(3).collect();
        let stats = member_stats(&chores);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].member, "Zoe");
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[0].completed, 1);
        assert_eq!(stats[0].points, Points::new(5));
        assert_eq!(stats[0].percent_done(), 50);
        assert_eq!(stats[1].member, "Kyle");
        assert_eq!(stats[1].points, Points::new(2));
    }

    #[test]
    fn test_board_groups_by_status() {
        let chores = chores();
        let board = board(
            &chores,
            &ChoreFilter::default(),
            &ctx(),
            UrgencyThreshold::CHORES,
        );
        let statuses: Vec<_> = board.groups.iter().map(|(s, _)| *s).collect();
        assert_eq!(statuses, vec![DisplayStatus::Overdue, DisplayStatus::Upcoming]);

        let upcoming = &board.groups[1].1;
        assert_eq!(upcoming[0].chore.name, "Laundry");
        assert!(upcoming[0].status.urgent);
        assert_eq!(upcoming[1].chore.name, "Garage");
        assert!(upcoming[1].status.days_until.is_none());
    }

    #[test]
    fn test_board_member_filter_is_case_insensitive() {
        let chores = chores();
        let filter = ChoreFilter {
            member: Some("KYLE".to_string()),
            show_completed: true,
        };
        let board = board(&chores, &filter, &ctx(), UrgencyThreshold::CHORES);
        let names: Vec<_> = board
            .groups
            .iter()
            .flat_map(|(_, rows)| rows.iter().map(|r| r.chore.name.as_str()))
            .collect();
        assert_eq!(names, vec!["Yard", "Garage", "Trash"]);
    }
}
