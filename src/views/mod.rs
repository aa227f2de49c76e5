//! Per-page derivations.
//!
//! Each view takes already-fetched records plus a [`ViewContext`] and
//! returns plain data for the renderer. Nothing here performs I/O or reads
//! the clock; "now" always comes in through the context.

pub mod bills;
pub mod calendar;
pub mod chores;
pub mod dashboard;
pub mod meals;
pub mod medical;
pub mod shopping;

pub use bills::{BillFilter, BillRow, BillSummary, BillsBoard};
pub use calendar::{CalendarView, UpcomingRow};
pub use chores::{ChoreFilter, ChoreRow, ChoresBoard, MemberStats};
pub use dashboard::{Dashboard, DashboardData, DashboardSummary};
pub use meals::{MealDay, MealWeek};
pub use medical::{AppointmentRow, MedicalOverview};
pub use shopping::{CategoryGroup, ShoppingList};

use chrono::{DateTime, NaiveDate, Utc};

use crate::time::Zone;

/// The household zone and the instant a view is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewContext {
    pub zone: Zone,
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
}

impl ViewContext {
    /// Context for `now` in `zone`.
    #[must_use]
    pub fn new(zone: Zone, now: DateTime<Utc>) -> Self {
        Self {
            zone,
            now,
            today: zone.today(now),
        }
    }

    /// Context pinned to the first instant of `day`.
    #[must_use]
    pub fn on_day(zone: Zone, day: NaiveDate) -> Self {
        Self {
            zone,
            now: zone.start_of_day(day),
            today: day,
        }
    }
}

/// Case-insensitive name match used by the member filters.
pub(crate) fn same_member(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::ViewContext;
    use crate::time::Zone;

    pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Sunday 2024-03-10 in UTC.
    pub fn ctx() -> ViewContext {
        ViewContext::on_day(Zone::utc(), day(2024, 3, 10))
    }

    pub fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Vec<T> {
        serde_json::from_str(json).unwrap()
    }
}
