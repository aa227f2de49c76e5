//! Calendar periods anchored to a reference day.
//!
//! This module provides the `Period` type used by every view that shows a
//! day, a Sunday-first week, or a month of records, plus the navigation
//! behind the previous/next buttons.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time::Zone;

/// Length of a week period in days.
pub const DAYS_PER_WEEK: i64 = 7;

/// The span a period covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// A single calendar day
    Day,
    /// Sunday through Saturday
    #[default]
    Week,
    /// A calendar month
    Month,
}

impl PeriodKind {
    /// Get display name for the kind.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    /// Get all period kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Day, Self::Week, Self::Month]
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for PeriodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("unknown period '{other}', expected day, week or month")),
        }
    }
}

/// A contiguous span of calendar days.
///
/// `start` is inclusive, `end` is the exclusive upper bound. For a week,
/// `start` is the most recent Sunday on or before `reference` and
/// `end = start + 7 days`.
///
/// Two periods are equal when they cover the same days; `reference` may
/// drift when month navigation clamps the day of month.
#[derive(Debug, Clone, Copy)]
pub struct Period {
    /// Day the period was computed from
    pub reference: NaiveDate,
    /// Span of the period
    pub kind: PeriodKind,
    /// First day (inclusive)
    pub start: NaiveDate,
    /// Day after the last day (exclusive)
    pub end: NaiveDate,
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        (self.kind, self.start, self.end) == (other.kind, other.start, other.end)
    }
}

impl Eq for Period {}

impl Hash for Period {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.kind, self.start, self.end).hash(state);
    }
}

impl Period {
    /// Compute the period of `kind` containing `reference`.
    #[must_use]
    pub fn compute(reference: NaiveDate, kind: PeriodKind) -> Self {
        let (start, end) = match kind {
            PeriodKind::Day => (reference, reference + Duration::days(1)),
            PeriodKind::Week => {
                let offset = i64::from(reference.weekday().num_days_from_sunday());
                let start = reference - Duration::days(offset);
                (start, start + Duration::days(DAYS_PER_WEEK))
            }
            PeriodKind::Month => {
                let start = first_of_month(reference);
                (start, start + Months::new(1))
            }
        };

        Self {
            reference,
            kind,
            start,
            end,
        }
    }

    /// Compute the period containing a timestamp's calendar day in `zone`.
    #[must_use]
    pub fn at(zone: &Zone, instant: DateTime<Utc>, kind: PeriodKind) -> Self {
        Self::compute(zone.today(instant), kind)
    }

    /// The period containing today ("This Week" / "Today").
    #[must_use]
    pub fn current(zone: &Zone, now: DateTime<Utc>, kind: PeriodKind) -> Self {
        Self::at(zone, now, kind)
    }

    /// Shift the reference by one period length in `direction` and recompute.
    ///
    /// Only the sign of `direction` matters; zero returns the same period.
    #[must_use]
    pub fn navigate(&self, direction: i32) -> Self {
        let step = direction.signum();
        if step == 0 {
            return *self;
        }

        let reference = match self.kind {
            PeriodKind::Day => self.reference + Duration::days(i64::from(step)),
            PeriodKind::Week => self.reference + Duration::days(i64::from(step) * DAYS_PER_WEEK),
            PeriodKind::Month => {
                let shifted = if step > 0 {
                    self.reference.checked_add_months(Months::new(1))
                } else {
                    self.reference.checked_sub_months(Months::new(1))
                };
                // Only fails at the edge of chrono's supported range.
                shifted.unwrap_or(self.reference)
            }
        };

        Self::compute(reference, self.kind)
    }

    /// Move by `offset` periods (negative goes back).
    #[must_use]
    pub fn offset(&self, offset: i32) -> Self {
        let mut period = *self;
        for _ in 0..offset.unsigned_abs() {
            period = period.navigate(offset.signum());
        }
        period
    }

    /// Inclusive final day of the period.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    /// Number of days in the period.
    #[must_use]
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Ordered days of the period, `[start, start + 1, ..., end - 1]`.
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d < self.end).collect()
    }

    /// Whether a calendar day falls inside the period.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }

    /// Half-open instant range `[start, end)` used when requesting the
    /// period's records from the backend.
    #[must_use]
    pub fn query_bounds(&self, zone: &Zone) -> (DateTime<Utc>, DateTime<Utc>) {
        (zone.start_of_day(self.start), zone.start_of_day(self.end))
    }

    /// Human-readable label, e.g. "Week of March 10".
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            PeriodKind::Day => self.start.format("%A, %B %-d").to_string(),
            PeriodKind::Week => format!("Week of {}", self.start.format("%B %-d")),
            PeriodKind::Month => self.start.format("%B %Y").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.day0()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // Wednesday
        let period = Period::compute(day(2024, 3, 13), PeriodKind::Week);
        assert_eq!(period.start, day(2024, 3, 10));
        assert_eq!(period.end, day(2024, 3, 17));
        assert_eq!(period.last_day(), day(2024, 3, 16));
        assert_eq!(period.len_days(), 7);
    }

    #[test]
    fn test_week_on_sunday_is_itself() {
        let period = Period::compute(day(2024, 3, 10), PeriodKind::Week);
        assert_eq!(period.start, day(2024, 3, 10));
    }

    #[test]
    fn test_week_days_sunday_to_saturday_for_every_weekday() {
        for offset in 0..60 {
            let reference = day(2023, 12, 1) + Duration::days(offset);
            let days = Period::compute(reference, PeriodKind::Week).days();
            assert_eq!(days.len(), 7);
            assert_eq!(days[0].weekday(), Weekday::Sun);
            assert_eq!(days[6].weekday(), Weekday::Sat);
            assert!(days.contains(&reference));
        }
    }

    #[test]
    fn test_week_crossing_year_boundary() {
        let period = Period::compute(day(2025, 1, 2), PeriodKind::Week);
        assert_eq!(period.start, day(2024, 12, 29));
        assert_eq!(period.last_day(), day(2025, 1, 4));
    }

    #[test]
    fn test_day_period() {
        let period = Period::compute(day(2024, 3, 10), PeriodKind::Day);
        assert_eq!(period.start, day(2024, 3, 10));
        assert_eq!(period.last_day(), day(2024, 3, 10));
        assert_eq!(period.days(), vec![day(2024, 3, 10)]);
    }

    #[test]
    fn test_month_period() {
        let period = Period::compute(day(2024, 2, 17), PeriodKind::Month);
        assert_eq!(period.start, day(2024, 2, 1));
        assert_eq!(period.end, day(2024, 3, 1));
        assert_eq!(period.days().len(), 29);
        assert_eq!(period.label(), "February 2024");
    }

    #[test]
    fn test_week_navigation_round_trip() {
        for offset in 0..30 {
            let reference = day(2024, 2, 20) + Duration::days(offset);
            let period = Period::compute(reference, PeriodKind::Week);
            assert_eq!(period.navigate(1).navigate(-1), period);
            assert_eq!(period.navigate(-1).navigate(1), period);
        }
    }

    #[test]
    fn test_week_navigation_moves_seven_days() {
        let period = Period::compute(day(2024, 3, 13), PeriodKind::Week);
        let next = period.navigate(1);
        assert_eq!(next.start, day(2024, 3, 17));
        assert_eq!(next.reference, day(2024, 3, 20));
        assert_eq!(period.navigate(-1).start, day(2024, 3, 3));
        assert_eq!(period.navigate(0), period);
    }

    #[test]
    fn test_month_navigation_keeps_boundaries() {
        let period = Period::compute(day(2024, 1, 31), PeriodKind::Month);
        let next = period.navigate(1);
        assert_eq!(next.start, day(2024, 2, 1));
        assert_eq!(next.reference, day(2024, 2, 29));
        let back = next.navigate(-1);
        assert_eq!(back, period);
        // the clamped reference does not come back
        assert_eq!(back.reference, day(2024, 1, 29));
    }

    #[test]
    fn test_offset() {
        let period = Period::compute(day(2024, 3, 13), PeriodKind::Week);
        assert_eq!(period.offset(2).start, day(2024, 3, 24));
        assert_eq!(period.offset(-2).start, day(2024, 2, 25));
        assert_eq!(period.offset(3).offset(-3), period);
    }

    #[test]
    fn test_contains() {
        let period = Period::compute(day(2024, 3, 13), PeriodKind::Week);
        assert!(period.contains(day(2024, 3, 10)));
        assert!(period.contains(day(2024, 3, 16)));
        assert!(!period.contains(day(2024, 3, 17)));
        assert!(!period.contains(day(2024, 3, 9)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            Period::compute(day(2024, 3, 13), PeriodKind::Week).label(),
            "Week of March 10"
        );
        assert_eq!(
            Period::compute(day(2024, 3, 10), PeriodKind::Day).label(),
            "Sunday, March 10"
        );
    }

    #[test]
    fn test_query_bounds_in_zone() {
        let zone = Zone::parse("America/New_York").unwrap();
        let period = Period::compute(day(2024, 1, 10), PeriodKind::Week);
        let (start, end) = period.query_bounds(&zone);
        assert_eq!(start, "2024-01-07T05:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(end, "2024-01-14T05:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_current_uses_zone() {
        let zone = Zone::parse("America/Chicago").unwrap();
        // Sunday evening in Chicago, already Monday in UTC
        let now: DateTime<Utc> = "2024-03-11T02:00:00Z".parse().unwrap();
        let period = Period::current(&zone, now, PeriodKind::Week);
        assert_eq!(period.start, day(2024, 3, 10));
        assert_eq!(Period::current(&Zone::utc(), now, PeriodKind::Week).start, day(2024, 3, 10));
    }

    #[test]
    fn test_period_kind_parse() {
        assert_eq!("Week".parse::<PeriodKind>().unwrap(), PeriodKind::Week);
        assert_eq!("month".parse::<PeriodKind>().unwrap(), PeriodKind::Month);
        assert!("fortnight".parse::<PeriodKind>().is_err());
        assert_eq!(PeriodKind::all().len(), 3);
    }
}
