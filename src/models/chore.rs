use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::{classify_optional, Classification, RawStatus, UrgencyThreshold};
use crate::time::{Timestamp, Zone};
use crate::types::Points;

/// A household chore assigned to one family member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: String,
    pub name: String,
    pub assigned_to: String,
    pub frequency: Frequency,
    pub status: RawStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Points>,
}

impl Chore {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == RawStatus::Completed
    }

    /// Points awarded for the chore, zero when unset.
    #[must_use]
    pub fn points(&self) -> Points {
        self.points.unwrap_or_default()
    }

    /// Display status of the chore on `today`.
    #[must_use]
    pub fn classify(
        &self,
        today: NaiveDate,
        zone: &Zone,
        threshold: UrgencyThreshold,
    ) -> Classification {
        let due = self.due_date.as_ref().map(|ts| zone.calendar_day(ts));
        classify_optional(self.status, due, today, threshold)
    }
}

/// How often a chore repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    #[serde(other)]
    Once,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Once => "once",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::DisplayStatus;

    #[test]
    fn test_chore_without_due_date() {
        let chore: Chore = serde_json::from_str(
            r#"{"id": "c1", "name": "Dishes", "assignedTo": "zoe",
                "frequency": "daily", "status": "pending", "points": 3}"#,
        )
        .unwrap();
        assert_eq!(chore.points(), Points::new(3));
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let c = chore.classify(today, &Zone::utc(), UrgencyThreshold::CHORES);
        assert_eq!(c.status, DisplayStatus::Upcoming);
        assert_eq!(c.days_until, None);
    }

    #[test]
    fn test_chore_with_due_date() {
        let chore: Chore = serde_json::from_str(
            r#"{"id": "c2", "name": "Trash", "assignedTo": "kyle",
                "frequency": "weekly", "status": "pending", "dueDate": "2024-03-13"}"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let c = chore.classify(today, &Zone::utc(), UrgencyThreshold::CHORES);
        assert_eq!(c.status, DisplayStatus::Upcoming);
        assert!(c.urgent);
        assert_eq!(chore.points(), Points::default());
    }
}
