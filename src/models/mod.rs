//! Records as received from the household backend.
//!
//! Field names follow the backend's camelCase JSON. Timestamps are parsed
//! into [`Timestamp`](crate::time::Timestamp) on deserialization, so a
//! record that made it into one of these types has valid dates.

mod bill;
mod chore;
mod event;
mod family;
mod meal;
mod medical;
mod shopping;

pub use bill::{Bill, BillCategory};
pub use chore::{Chore, Frequency};
pub use event::{CalendarEvent, EventType};
pub use family::{
    FamilyMember, FamilyMemberStatus, HealthStatus, ModuleHealth, NextAppointment, Presence, Role,
    SystemHealth,
};
pub use meal::{MealPlan, MealType};
pub use medical::{
    Appointment, AppointmentType, MedicalRecord, Medication, RecordType, ResultStatus,
};
pub use shopping::{ItemPriority, ItemSource, NewShoppingItem, ShoppingCategory, ShoppingItem};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Decode a list response.
///
/// The backend wraps lists in an object (`{"bills": [...]}`); a bare array
/// is accepted too. A missing key decodes as an empty list.
pub fn decode_list<T: DeserializeOwned>(body: &str, key: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(list) => Ok(serde_json::from_value(list)?),
        },
        other => Err(Error::backend(format!(
            "expected a list or an object with '{key}', got {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_and_bare() {
        let wrapped = r#"{"bills": [{"id": "b1", "name": "Power", "amount": 120.5,
            "dueDate": "2024-03-12", "category": "utilities", "status": "pending",
            "isRecurring": true}]}"#;
        let bills: Vec<Bill> = decode_list(wrapped, "bills").unwrap();
        assert_eq!(bills.len(), 1);

        let bare = r#"[{"id": "b1", "name": "Power", "amount": 1,
            "dueDate": "2024-03-12", "category": "utilities", "status": "pending"}]"#;
        let bills: Vec<Bill> = decode_list(bare, "bills").unwrap();
        assert_eq!(bills[0].name, "Power");
    }

    #[test]
    fn test_decode_missing_key_is_empty() {
        let bills: Vec<Bill> = decode_list(r#"{"other": []}"#, "bills").unwrap();
        assert!(bills.is_empty());
        let bills: Vec<Bill> = decode_list(r#"{"bills": null}"#, "bills").unwrap();
        assert!(bills.is_empty());
    }

    #[test]
    fn test_decode_rejects_scalars_and_bad_dates() {
        assert!(decode_list::<Bill>("42", "bills").is_err());
        let bad_date = r#"[{"id": "b1", "name": "Power", "amount": 1,
            "dueDate": "whenever", "category": "utilities", "status": "pending"}]"#;
        assert!(decode_list::<Bill>(bad_date, "bills").is_err());
    }
}
