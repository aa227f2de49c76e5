//! Dashboard home page: summary cards, family, upcoming events, health.

use tracing::warn;

use crate::aggregate::count_by;
use crate::config::UrgencyConfig;
use crate::error::Result;
use crate::models::{
    Bill, CalendarEvent, Chore, FamilyMemberStatus, Medication, ShoppingItem, SystemHealth,
};
use crate::source::Backend;
use crate::status::DisplayStatus;
use crate::types::Cents;

use super::calendar::{upcoming_list, UpcomingRow};
use super::{bills, ViewContext};

/// Records backing the dashboard, as fetched.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub bills: Vec<Bill>,
    pub chores: Vec<Chore>,
    pub events: Vec<CalendarEvent>,
    pub medications: Vec<Medication>,
    pub shopping: Vec<ShoppingItem>,
    pub family: Vec<FamilyMemberStatus>,
    pub health: SystemHealth,
}

impl Default for DashboardData {
    fn default() -> Self {
        Self {
            bills: Vec::new(),
            chores: Vec::new(),
            events: Vec::new(),
            medications: Vec::new(),
            shopping: Vec::new(),
            family: Vec::new(),
            health: SystemHealth::unhealthy(),
        }
    }
}

fn or_empty<T>(what: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!("Failed to fetch {what}: {err}");
        Vec::new()
    })
}

impl DashboardData {
    /// Fetch everything concurrently.
    ///
    /// A failed fetch leaves its section empty; a failed health check
    /// reads as unhealthy.
    pub async fn fetch(backend: &dyn Backend, ctx: &ViewContext, upcoming_limit: usize) -> Self {
        let (bills, chores, events, medications, shopping, family, health) = futures::join!(
            backend.bills(),
            backend.chores(),
            backend.upcoming_events(ctx.now, upcoming_limit),
            backend.medications(),
            backend.shopping_items(),
            backend.family_dashboard(),
            backend.health(),
        );

        Self {
            bills: or_empty("bills", bills),
            chores: or_empty("chores", chores),
            events: or_empty("events", events),
            medications: or_empty("medications", medications),
            shopping: or_empty("shopping list", shopping),
            family: or_empty("family", family),
            health: health.unwrap_or_else(|err| {
                warn!("Health check failed: {err}");
                SystemHealth::unhealthy()
            }),
        }
    }
}

/// Numbers on the summary cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub bills_due: Cents,
    pub bills_overdue: usize,
    pub bills_due_soon: usize,
    pub chores_open: usize,
    pub chores_overdue: usize,
    pub events_today: usize,
    pub refills_due: usize,
    pub shopping_left: usize,
    pub home: usize,
    pub away: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub summary: DashboardSummary,
    pub family: &'a [FamilyMemberStatus],
    pub upcoming: Vec<UpcomingRow<'a>>,
    pub health: &'a SystemHealth,
}

/// Summary cards for `data`.
#[must_use]
pub fn summary(data: &DashboardData, ctx: &ViewContext, urgency: &UrgencyConfig) -> DashboardSummary {
    let window = i64::from(urgency.upcoming_window_days);
    let bills = bills::summary(&data.bills, ctx, urgency.bills(), window);

    let chore_status = count_by(&data.chores, |c| {
        c.classify(ctx.today, &ctx.zone, urgency.chores()).status
    });
    let chores_open: usize = chore_status
        .iter()
        .filter(|(status, _)| {
            !matches!(status, DisplayStatus::Completed | DisplayStatus::Cancelled)
        })
        .map(|(_, n)| n)
        .sum();

    let presence = count_by(&data.family, FamilyMemberStatus::is_home);

    DashboardSummary {
        bills_due: bills.total_due,
        bills_overdue: bills.overdue,
        bills_due_soon: bills.due_soon,
        chores_open,
        chores_overdue: chore_status
            .get(&DisplayStatus::Overdue)
            .copied()
            .unwrap_or(0),
        events_today: data
            .events
            .iter()
            .filter(|e| ctx.zone.calendar_day(&e.start) == ctx.today)
            .count(),
        refills_due: data
            .medications
            .iter()
            .filter(|m| m.needs_refill(ctx.today, &ctx.zone, i64::from(urgency.refill_window_days)))
            .count(),
        shopping_left: data.shopping.iter().filter(|i| !i.checked).count(),
        home: presence.get(&true).copied().unwrap_or(0),
        away: presence.get(&false).copied().unwrap_or(0),
    }
}

/// The dashboard page.
#[must_use]
pub fn dashboard<'a>(
    data: &'a DashboardData,
    ctx: &ViewContext,
    urgency: &UrgencyConfig,
    upcoming_limit: usize,
) -> Dashboard<'a> {
    Dashboard {
        summary: summary(data, ctx, urgency),
        family: &data.family,
        upcoming: upcoming_list(&data.events, ctx, upcoming_limit),
        health: &data.health,
    }
}
