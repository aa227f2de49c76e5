use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::bucket::TimedRecord;
use crate::time::{Timestamp, Zone};

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(alias = "startTime")]
    pub start: Timestamp,
    #[serde(default, alias = "endTime", skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_member: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub family_member_ids: Vec<String>,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
}

impl CalendarEvent {
    /// Length of the event, `None` without an end or when the end precedes
    /// the start.
    #[must_use]
    pub fn duration(&self, zone: &Zone) -> Option<Duration> {
        let end = self.end.as_ref()?;
        let span = zone.instant(end) - zone.instant(&self.start);
        (span >= Duration::zero()).then_some(span)
    }

    /// Whether the event involves `member` (by name or id).
    #[must_use]
    pub fn involves(&self, member: &str) -> bool {
        self.family_member
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(member))
            || self.family_member_ids.iter().any(|id| id == member)
    }
}

impl TimedRecord for CalendarEvent {
    fn timestamp(&self) -> &Timestamp {
        &self.start
    }

    fn end_timestamp(&self) -> Option<&Timestamp> {
        self.end.as_ref()
    }

    fn all_day(&self) -> bool {
        self.all_day || self.start.is_date_only()
    }
}

/// Kind of calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Appointment,
    School,
    Work,
    Family,
    Reminder,
    Event,
    #[default]
    #[serde(other)]
    Other,
}

impl EventType {
    /// Get display name for the event type.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Appointment => "Appointment",
            Self::School => "School",
            Self::Work => "Work",
            Self::Family => "Family",
            Self::Reminder => "Reminder",
            Self::Event => "Event",
            Self::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_dashboard_field_names() {
        let event: CalendarEvent = serde_json::from_str(
            r#"{"id": "e1", "title": "Dentist", "startTime": "2024-03-12T09:00:00Z",
                "endTime": "2024-03-12T10:00:00Z", "familyMemberIds": ["m1"],
                "type": "appointment"}"#,
        )
        .unwrap();
        assert_eq!(event.event_type, EventType::Appointment);
        assert_eq!(event.duration(&Zone::utc()), Some(Duration::hours(1)));
        assert!(event.involves("m1"));
        assert!(!event.all_day());
    }

    #[test]
    fn test_inverted_span_has_no_duration() {
        let event: CalendarEvent = serde_json::from_str(
            r#"{"id": "e2", "title": "Oops", "start": "2024-03-12T10:00:00",
                "end": "2024-03-12T09:00:00"}"#,
        )
        .unwrap();
        assert_eq!(event.duration(&Zone::utc()), None);
        assert_eq!(event.event_type, EventType::Other);
    }

    #[test]
    fn test_date_only_start_is_all_day() {
        let event: CalendarEvent = serde_json::from_str(
            r#"{"id": "e3", "title": "Field trip", "start": "2024-03-14",
                "familyMember": "Zoe", "type": "school"}"#,
        )
        .unwrap();
        assert!(event.all_day());
        assert!(event.involves("zoe"));
    }
}
