//! Display status derivation.
//!
//! A record's display status is computed from its stored status, its due
//! date and the current calendar day. Nothing here reads the clock: the
//! caller passes `today` explicitly, so the same inputs always classify
//! the same way.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, Zone};
use crate::types::DayCount;

/// Records further out than this are plainly "upcoming".
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Status as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RawStatus {
    #[default]
    Pending,
    Upcoming,
    Overdue,
    Paid,
    Completed,
    Cancelled,
}

impl RawStatus {
    /// Whether the record is settled (paid or completed).
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Paid | Self::Completed)
    }

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Upcoming => "upcoming",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<&str> for RawStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "upcoming" | "scheduled" => Self::Upcoming,
            "overdue" => Self::Overdue,
            "paid" => Self::Paid,
            "completed" | "complete" | "done" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

impl From<String> for RawStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<RawStatus> for String {
    fn from(value: RawStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presentation status, derived and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStatus {
    Overdue,
    DueToday,
    DueTomorrow,
    Upcoming,
    Completed,
    Cancelled,
}

/// Visual emphasis for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Danger,
    Warning,
    Success,
    Neutral,
    Muted,
}

impl DisplayStatus {
    /// Get display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::DueToday => "Due today",
            Self::DueTomorrow => "Due tomorrow",
            Self::Upcoming => "Upcoming",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Every status, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Overdue,
            Self::DueToday,
            Self::DueTomorrow,
            Self::Upcoming,
            Self::Completed,
            Self::Cancelled,
        ]
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How many days out an upcoming record still counts as urgent.
///
/// Bills and chores use 3 days, medical appointments 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrgencyThreshold(pub u32);

impl UrgencyThreshold {
    pub const BILLS: Self = Self(3);
    pub const CHORES: Self = Self(3);
    pub const MEDICAL: Self = Self(2);

    #[must_use]
    pub fn days(self) -> i64 {
        i64::from(self.0)
    }
}

impl Default for UrgencyThreshold {
    fn default() -> Self {
        Self::BILLS
    }
}

/// Result of classifying one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub status: DisplayStatus,
    /// Due day minus today; `None` when the record has no due date.
    pub days_until: Option<DayCount>,
    /// Days past due, only for overdue records with a known due date.
    pub overdue_by: Option<DayCount>,
    /// Emphasis flag for records that need attention soon.
    pub urgent: bool,
}

impl Classification {
    const fn settled(status: DisplayStatus) -> Self {
        Self {
            status,
            days_until: None,
            overdue_by: None,
            urgent: false,
        }
    }

    /// Visual tone for this classification.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self.status {
            DisplayStatus::Overdue => Tone::Danger,
            DisplayStatus::Completed => Tone::Success,
            DisplayStatus::Cancelled => Tone::Muted,
            _ if self.urgent => Tone::Warning,
            _ => Tone::Neutral,
        }
    }

    /// Short phrase such as "Due in 4 days" or "Overdue by 5 days".
    #[must_use]
    pub fn due_phrase(&self) -> String {
        match (self.status, self.days_until) {
            (DisplayStatus::Completed, _) => "Done".to_string(),
            (DisplayStatus::Cancelled, _) => "Cancelled".to_string(),
            (DisplayStatus::Overdue, _) => match self.overdue_by {
                Some(days) => format!("Overdue by {days}"),
                None => "Overdue".to_string(),
            },
            (DisplayStatus::DueToday, _) => "Due today".to_string(),
            (DisplayStatus::DueTomorrow, _) => "Due tomorrow".to_string(),
            (DisplayStatus::Upcoming, Some(days)) => format!("Due in {days}"),
            (DisplayStatus::Upcoming, None) => "No due date".to_string(),
        }
    }

    /// Whether the record is due within `window` days (today included),
    /// overdue records excluded.
    #[must_use]
    pub fn due_within(&self, window: i64) -> bool {
        matches!(self.days_until, Some(d) if (0..=window).contains(&d.get()))
            && !matches!(
                self.status,
                DisplayStatus::Completed | DisplayStatus::Cancelled
            )
    }
}

/// Classify a record with a known due day.
///
/// Time-of-day never matters: `due` is already a calendar day, so a record
/// due at 23:59 today is `DueToday`, not `Overdue`.
#[must_use]
pub fn classify(
    raw: RawStatus,
    due: NaiveDate,
    today: NaiveDate,
    threshold: UrgencyThreshold,
) -> Classification {
    if raw.is_done() {
        return Classification::settled(DisplayStatus::Completed);
    }
    if raw == RawStatus::Cancelled {
        return Classification::settled(DisplayStatus::Cancelled);
    }

    let days_until = (due - today).num_days();
    let (status, urgent) = match days_until {
        d if d < 0 => (DisplayStatus::Overdue, true),
        0 => (DisplayStatus::DueToday, true),
        1 => (DisplayStatus::DueTomorrow, true),
        d if d <= UPCOMING_WINDOW_DAYS => (DisplayStatus::Upcoming, d <= threshold.days()),
        _ => (DisplayStatus::Upcoming, false),
    };

    Classification {
        status,
        days_until: Some(DayCount::new(days_until)),
        overdue_by: (days_until < 0).then(|| DayCount::new(-days_until)),
        urgent,
    }
}

/// Classify a timestamp-carrying record in `zone`.
#[must_use]
pub fn classify_at(
    raw: RawStatus,
    due: &Timestamp,
    today: NaiveDate,
    zone: &Zone,
    threshold: UrgencyThreshold,
) -> Classification {
    classify(raw, zone.calendar_day(due), today, threshold)
}

/// Classify a record whose due date may be missing.
#[must_use]
pub fn classify_optional(
    raw: RawStatus,
    due: Option<NaiveDate>,
    today: NaiveDate,
    threshold: UrgencyThreshold,
) -> Classification {
    match due {
        Some(due) => classify(raw, due, today, threshold),
        None if raw.is_done() => Classification::settled(DisplayStatus::Completed),
        None if raw == RawStatus::Cancelled => Classification::settled(DisplayStatus::Cancelled),
        None if raw == RawStatus::Overdue => Classification {
            status: DisplayStatus::Overdue,
            days_until: None,
            overdue_by: None,
            urgent: true,
        },
        None => Classification::settled(DisplayStatus::Upcoming),
    }
}
