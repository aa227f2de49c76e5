use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bucket::TimedRecord;
use crate::status::{classify_at, Classification, RawStatus, UrgencyThreshold};
use crate::time::{Timestamp, Zone};
use crate::types::DayCount;

/// A scheduled medical appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    pub date: Timestamp,
    /// Free-form time of day as entered, e.g. "2:30 PM"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: RawStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    /// Display status of the appointment on `today`.
    #[must_use]
    pub fn classify(
        &self,
        today: NaiveDate,
        zone: &Zone,
        threshold: UrgencyThreshold,
    ) -> Classification {
        classify_at(self.status, &self.date, today, zone, threshold)
    }
}

impl TimedRecord for Appointment {
    fn timestamp(&self) -> &Timestamp {
        &self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentType {
    Checkup,
    Specialist,
    Therapy,
    Dental,
    Vision,
    #[serde(other)]
    Other,
}

/// A medication someone in the household takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub taken_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_refill_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescriber: Option<String>,
}

impl Medication {
    /// Days until the next refill, negative when it is late.
    #[must_use]
    pub fn days_until_refill(&self, today: NaiveDate, zone: &Zone) -> Option<DayCount> {
        self.next_refill_date
            .as_ref()
            .map(|ts| DayCount::new((zone.calendar_day(ts) - today).num_days()))
    }

    /// Whether a refill is due within `window` days. Late refills count.
    #[must_use]
    pub fn needs_refill(&self, today: NaiveDate, zone: &Zone, window: i64) -> bool {
        self.days_until_refill(today, zone)
            .is_some_and(|days| days.get() <= window)
    }
}

/// A stored result, note or referral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    pub patient_name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: String,
    pub date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResultStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl MedicalRecord {
    /// Whether the result needs a follow-up.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        matches!(
            self.status,
            Some(ResultStatus::Abnormal | ResultStatus::Critical)
        )
    }
}

impl TimedRecord for MedicalRecord {
    fn timestamp(&self) -> &Timestamp {
        &self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    LabResult,
    Imaging,
    Diagnosis,
    Referral,
    #[serde(other)]
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Normal,
    Abnormal,
    Critical,
    #[serde(other)]
    Pending,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::DisplayStatus;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn medication(refill: Option<&str>) -> Medication {
        Medication {
            id: "rx1".to_string(),
            name: "Amoxicillin".to_string(),
            dosage: "250mg".to_string(),
            frequency: "twice daily".to_string(),
            taken_by: "Zoe".to_string(),
            next_refill_date: refill.map(|r| r.parse().unwrap()),
            prescriber: None,
        }
    }

    #[test]
    fn test_refill_window() {
        let today = day(2024, 3, 10);
        let zone = Zone::utc();
        assert!(medication(Some("2024-03-17")).needs_refill(today, &zone, 7));
        assert!(!medication(Some("2024-03-18")).needs_refill(today, &zone, 7));
        assert!(medication(Some("2024-03-01")).needs_refill(today, &zone, 7));
        assert!(!medication(None).needs_refill(today, &zone, 7));
    }

    #[test]
    fn test_appointment_uses_medical_threshold() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id": "a1", "patientName": "Zoe", "provider": "Dr. Patel",
                "date": "2024-03-13", "type": "checkup", "status": "upcoming"}"#,
        )
        .unwrap();
        let c = appt.classify(day(2024, 3, 10), &Zone::utc(), UrgencyThreshold::MEDICAL);
        assert_eq!(c.status, DisplayStatus::Upcoming);
        assert!(!c.urgent);
    }

    #[test]
    fn test_record_attention() {
        let record: MedicalRecord = serde_json::from_str(
            r#"{"id": "r1", "patientName": "Kyle", "type": "lab_result",
                "title": "Blood panel", "date": "2024-02-01", "status": "abnormal"}"#,
        )
        .unwrap();
        assert!(record.needs_attention());
        assert_eq!(record.record_type, RecordType::LabResult);
    }
}
