use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bucket::TimedRecord;
use crate::status::{classify_at, Classification, RawStatus, UrgencyThreshold};
use crate::time::{Timestamp, Zone};
use crate::types::Cents;

/// A household bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: Cents,
    pub due_date: Timestamp,
    pub category: BillCategory,
    pub status: RawStatus,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autopay: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Timestamp>,
}

impl Bill {
    /// Whether the bill has been paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == RawStatus::Paid
    }

    /// Whether the bill pays itself.
    #[must_use]
    pub fn is_autopay(&self) -> bool {
        self.autopay.unwrap_or(false)
    }

    /// Display status of the bill on `today`.
    #[must_use]
    pub fn classify(
        &self,
        today: NaiveDate,
        zone: &Zone,
        threshold: UrgencyThreshold,
    ) -> Classification {
        classify_at(self.status, &self.due_date, today, zone, threshold)
    }
}

impl TimedRecord for Bill {
    fn timestamp(&self) -> &Timestamp {
        &self.due_date
    }
}

/// Bill category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillCategory {
    Utilities,
    Housing,
    Insurance,
    Subscriptions,
    Medical,
    #[serde(other)]
    Other,
}

impl BillCategory {
    /// Get display name for the category.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Utilities => "Utilities",
            Self::Housing => "Housing",
            Self::Insurance => "Insurance",
            Self::Subscriptions => "Subscriptions",
            Self::Medical => "Medical",
            Self::Other => "Other",
        }
    }

    /// Get all categories, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Utilities,
            Self::Housing,
            Self::Insurance,
            Self::Subscriptions,
            Self::Medical,
            Self::Other,
        ]
    }
}

impl fmt::Display for BillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for BillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown bill category '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_is_other() {
        let bill: Bill = serde_json::from_str(
            r#"{"id": "1", "name": "Gym", "amount": 40, "dueDate": "2024-03-01",
                "category": "fitness", "status": "pending"}"#,
        )
        .unwrap();
        assert_eq!(bill.category, BillCategory::Other);
        assert!(!bill.is_recurring);
        assert!(!bill.is_autopay());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("housing".parse::<BillCategory>().unwrap(), BillCategory::Housing);
        assert!("groceries".parse::<BillCategory>().is_err());
    }
}
