//! Request/response contract with the household backend.
//!
//! The dashboard only ever talks to the backend through [`Backend`]. The
//! crate ships [`SnapshotBackend`], which serves the same response bodies
//! from JSON files on disk and writes mutations back to them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::bucket::upcoming;
use crate::error::{Error, Result};
use crate::models::{
    decode_list, Appointment, Bill, CalendarEvent, Chore, FamilyMemberStatus,
    MealPlan, MedicalRecord, Medication, NewShoppingItem, ShoppingItem, SystemHealth,
};
use crate::status::RawStatus;
use crate::time::{Timestamp, Zone};

/// One call the dashboard makes against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Bills,
    Chores,
    FamilyDashboard,
    Events {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    UpcomingEvents {
        limit: usize,
    },
    MealPlans {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Appointments,
    Medications,
    MedicalRecords,
    Shopping,
    Health,
    PayBill {
        id: String,
    },
    CompleteChore {
        id: String,
    },
    ToggleItem {
        id: String,
    },
    AddItem,
    RemoveItem {
        id: String,
    },
    ClearChecked,
    GenerateMealPlan,
}

fn query_time(at: &DateTime<Utc>) -> String {
    urlencoding::encode(&at.to_rfc3339_opts(SecondsFormat::Secs, true)).into_owned()
}

impl Request {
    /// HTTP method the backend expects.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::PayBill { .. }
            | Self::CompleteChore { .. }
            | Self::ToggleItem { .. }
            | Self::AddItem
            | Self::ClearChecked
            | Self::GenerateMealPlan => "POST",
            Self::RemoveItem { .. } => "DELETE",
            _ => "GET",
        }
    }

    /// Path and query string, relative to the backend root.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Bills => "/api/bills".to_string(),
            Self::Chores => "/api/chores".to_string(),
            Self::FamilyDashboard => "/api/family/dashboard".to_string(),
            Self::Events { start, end } => format!(
                "/api/calendar/events?start={}&end={}",
                query_time(start),
                query_time(end)
            ),
            Self::UpcomingEvents { limit } => format!("/api/calendar/upcoming?limit={limit}"),
            Self::MealPlans { start, end } => format!(
                "/api/meals?start={}&end={}",
                query_time(start),
                query_time(end)
            ),
            Self::Appointments => "/api/medical/appointments".to_string(),
            Self::Medications => "/api/medical/medications".to_string(),
            Self::MedicalRecords => "/api/medical/records".to_string(),
            Self::Shopping => "/api/shopping".to_string(),
            Self::Health => "/api/health".to_string(),
            Self::PayBill { id } => format!("/api/bills/{}/pay", urlencoding::encode(id)),
            Self::CompleteChore { id } => {
                format!("/api/chores/{}/complete", urlencoding::encode(id))
            }
            Self::ToggleItem { id } => format!("/api/shopping/{}/toggle", urlencoding::encode(id)),
            Self::AddItem => "/api/shopping".to_string(),
            Self::RemoveItem { id } => format!("/api/shopping/{}", urlencoding::encode(id)),
            Self::ClearChecked => "/api/shopping/clear-checked".to_string(),
            Self::GenerateMealPlan => "/api/meals/generate".to_string(),
        }
    }

    /// Snapshot file and list key serving this request, for reads.
    #[must_use]
    pub const fn snapshot(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Bills => Some(("bills.json", "bills")),
            Self::Chores => Some(("chores.json", "chores")),
            Self::FamilyDashboard => Some(("dashboard.json", "members")),
            Self::Events { .. } | Self::UpcomingEvents { .. } => Some(("events.json", "events")),
            Self::MealPlans { .. } => Some(("meals.json", "plans")),
            Self::Appointments => Some(("appointments.json", "appointments")),
            Self::Medications => Some(("medications.json", "medications")),
            Self::MedicalRecords => Some(("records.json", "records")),
            Self::Shopping => Some(("shopping.json", "items")),
            Self::Health => Some(("health.json", "health")),
            _ => None,
        }
    }
}

/// Body of a meal-plan generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanRequest {
    pub week_start: NaiveDate,
    pub preferences: MealPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPreferences {
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

/// Everything the dashboard reads from or writes to the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn bills(&self) -> Result<Vec<Bill>>;

    async fn chores(&self) -> Result<Vec<Chore>>;

    /// Per-member cards with presence and counts.
    async fn family_dashboard(&self) -> Result<Vec<FamilyMemberStatus>>;

    /// Events starting in `[start, end)`.
    async fn events(&self, start: DateTime<Utc>, end: DateTime<Utc>)
        -> Result<Vec<CalendarEvent>>;

    /// The next `limit` events starting at or after `from`.
    async fn upcoming_events(&self, from: DateTime<Utc>, limit: usize)
        -> Result<Vec<CalendarEvent>>;

    /// Meal plans dated in `[start, end)`.
    async fn meal_plans(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MealPlan>>;

    async fn appointments(&self) -> Result<Vec<Appointment>>;

    async fn medications(&self) -> Result<Vec<Medication>>;

    async fn medical_records(&self) -> Result<Vec<MedicalRecord>>;

    async fn shopping_items(&self) -> Result<Vec<ShoppingItem>>;

    async fn health(&self) -> Result<SystemHealth>;

    /// Mark a bill paid and return the updated record.
    async fn pay_bill(&self, id: &str) -> Result<Bill>;

    /// Mark a chore completed and return the updated record.
    async fn complete_chore(&self, id: &str) -> Result<Chore>;

    /// Flip the checked flag of a shopping item.
    async fn toggle_item(&self, id: &str) -> Result<ShoppingItem>;

    async fn add_item(&self, item: NewShoppingItem) -> Result<ShoppingItem>;

    async fn remove_item(&self, id: &str) -> Result<()>;

    /// Remove every checked item, returning how many went.
    async fn clear_checked(&self) -> Result<usize>;

    /// Ask the backend to plan a week of meals.
    async fn generate_meal_plan(&self, request: &MealPlanRequest) -> Result<Vec<MealPlan>>;
}

#[derive(Debug, Default)]
struct Overlay {
    bills: Option<Vec<Bill>>,
    chores: Option<Vec<Chore>>,
    shopping: Option<Vec<ShoppingItem>>,
}

/// Serves backend responses from a directory of JSON snapshots.
///
/// Each read request maps to one file holding the body the backend would
/// return (see [`Request::snapshot`]). Mutations update an in-memory copy
/// and write it back to the same file.
#[derive(Debug)]
pub struct SnapshotBackend {
    dir: PathBuf,
    zone: Zone,
    overlay: Mutex<Overlay>,
}

impl SnapshotBackend {
    /// Create a backend over `dir`; floating timestamps resolve in `zone`.
    pub fn new(dir: impl Into<PathBuf>, zone: Zone) -> Self {
        Self {
            dir: dir.into(),
            zone,
            overlay: Mutex::new(Overlay::default()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_body(&self, request: &Request) -> Result<String> {
        let (file, _) = request.snapshot().ok_or_else(|| {
            Error::backend(format!(
                "{} {} has no snapshot",
                request.method(),
                request.path()
            ))
        })?;
        let path = self.dir.join(file);
        debug!(request = %request.path(), file = %path.display(), "Reading snapshot");

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(Error::backend(
                format!("no snapshot for {} at {}", request.path(), path.display()),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn read_list<T: DeserializeOwned>(&self, request: &Request) -> Result<Vec<T>> {
        let body = self.read_body(request).await?;
        let key = request.snapshot().map_or("", |(_, key)| key);
        decode_list(&body, key)
    }

    async fn load_into<'s, T: DeserializeOwned + Send>(
        &self,
        slot: &'s mut Option<Vec<T>>,
        request: &Request,
    ) -> Result<&'s mut Vec<T>> {
        if slot.is_none() {
            *slot = Some(self.read_list(request).await?);
        }
        Ok(slot.get_or_insert_with(Vec::new))
    }

    /// Write `records` back to the request's snapshot file.
    async fn write_list<T: Serialize + Sync>(
        &self,
        request: &Request,
        records: &[T],
    ) -> Result<()> {
        let (file, key) = request
            .snapshot()
            .ok_or_else(|| Error::backend(format!("{} has no snapshot", request.path())))?;
        let mut body = BTreeMap::new();
        body.insert(key, records);
        let contents = serde_json::to_string_pretty(&body)?;

        let path = self.dir.join(file);
        tokio::fs::write(&path, contents).await?;
        debug!(file = %path.display(), records = records.len(), "Wrote snapshot");
        Ok(())
    }

    fn in_window<'a, T: crate::bucket::TimedRecord>(
        &self,
        records: &'a [T],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a T> + 'a {
        let zone = self.zone;
        records.iter().filter(move |r| {
            let at = zone.instant(r.timestamp());
            start <= at && at < end
        })
    }
}

fn not_found(kind: &str, id: &str) -> Error {
    Error::backend(format!("no {kind} with id '{id}'"))
}

#[async_trait]
impl Backend for SnapshotBackend {
    async fn bills(&self) -> Result<Vec<Bill>> {
        if let Some(bills) = &self.overlay.lock().await.bills {
            return Ok(bills.clone());
        }
        self.read_list(&Request::Bills).await
    }

    async fn chores(&self) -> Result<Vec<Chore>> {
        if let Some(chores) = &self.overlay.lock().await.chores {
            return Ok(chores.clone());
        }
        self.read_list(&Request::Chores).await
    }

    async fn family_dashboard(&self) -> Result<Vec<FamilyMemberStatus>> {
        self.read_list(&Request::FamilyDashboard).await
    }

    async fn events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let events: Vec<CalendarEvent> = self.read_list(&Request::Events { start, end }).await?;
        Ok(self.in_window(&events, start, end).cloned().collect())
    }

    async fn upcoming_events(
        &self,
        from: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CalendarEvent>> {
        let events: Vec<CalendarEvent> =
            self.read_list(&Request::UpcomingEvents { limit }).await?;
        Ok(upcoming(&events, &self.zone, from, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn meal_plans(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MealPlan>> {
        let plans: Vec<MealPlan> = self.read_list(&Request::MealPlans { start, end }).await?;
        Ok(self.in_window(&plans, start, end).cloned().collect())
    }

    async fn appointments(&self) -> Result<Vec<Appointment>> {
        self.read_list(&Request::Appointments).await
    }

    async fn medications(&self) -> Result<Vec<Medication>> {
        self.read_list(&Request::Medications).await
    }

    async fn medical_records(&self) -> Result<Vec<MedicalRecord>> {
        self.read_list(&Request::MedicalRecords).await
    }

    async fn shopping_items(&self) -> Result<Vec<ShoppingItem>> {
        if let Some(items) = &self.overlay.lock().await.shopping {
            return Ok(items.clone());
        }
        self.read_list(&Request::Shopping).await
    }

    async fn health(&self) -> Result<SystemHealth> {
        let body = self.read_body(&Request::Health).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn pay_bill(&self, id: &str) -> Result<Bill> {
        let request = Request::PayBill { id: id.to_string() };
        let mut overlay = self.overlay.lock().await;
        let bills = self.load_into(&mut overlay.bills, &Request::Bills).await?;
        let bill = bills
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("bill", id))?;

        bill.status = RawStatus::Paid;
        bill.paid_at = Some(Timestamp::utc(Utc::now()));
        info!(request = %request.path(), "Marked '{}' paid", bill.name);
        let paid = bill.clone();

        self.write_list(&Request::Bills, bills.as_slice()).await?;
        Ok(paid)
    }

    async fn complete_chore(&self, id: &str) -> Result<Chore> {
        let request = Request::CompleteChore { id: id.to_string() };
        let mut overlay = self.overlay.lock().await;
        let chores = self.load_into(&mut overlay.chores, &Request::Chores).await?;
        let chore = chores
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("chore", id))?;

        chore.status = RawStatus::Completed;
        chore.completed_at = Some(Timestamp::utc(Utc::now()));
        info!(request = %request.path(), "Completed '{}'", chore.name);
        let completed = chore.clone();

        self.write_list(&Request::Chores, chores.as_slice()).await?;
        Ok(completed)
    }

    async fn toggle_item(&self, id: &str) -> Result<ShoppingItem> {
        let request = Request::ToggleItem { id: id.to_string() };
        let mut overlay = self.overlay.lock().await;
        let items = self.load_into(&mut overlay.shopping, &Request::Shopping).await?;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("shopping item", id))?;

        item.checked = !item.checked;
        debug!(request = %request.path(), checked = item.checked, "Toggled item");
        let toggled = item.clone();

        self.write_list(&Request::Shopping, items.as_slice()).await?;
        Ok(toggled)
    }

    async fn add_item(&self, item: NewShoppingItem) -> Result<ShoppingItem> {
        let mut overlay = self.overlay.lock().await;
        let items = self.load_into(&mut overlay.shopping, &Request::Shopping).await?;

        let mut n = items.len() + 1;
        while items.iter().any(|i| i.id == format!("local-{n}")) {
            n += 1;
        }
        let added = ShoppingItem {
            id: format!("local-{n}"),
            name: item.name,
            quantity: item.quantity,
            unit: item.unit,
            category: item.category,
            checked: false,
            added_by: None,
            source: Some(crate::models::ItemSource::Manual),
            priority: None,
        };
        let request = Request::AddItem;
        debug!(request = %request.path(), id = %added.id, "Added item");
        items.push(added.clone());
        self.write_list(&Request::Shopping, items.as_slice()).await?;
        Ok(added)
    }

    async fn remove_item(&self, id: &str) -> Result<()> {
        let mut overlay = self.overlay.lock().await;
        let items = self.load_into(&mut overlay.shopping, &Request::Shopping).await?;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(not_found("shopping item", id));
        }
        self.write_list(&Request::Shopping, items.as_slice()).await
    }

    async fn clear_checked(&self) -> Result<usize> {
        let mut overlay = self.overlay.lock().await;
        let items = self.load_into(&mut overlay.shopping, &Request::Shopping).await?;
        let before = items.len();
        items.retain(|i| !i.checked);
        let removed = before - items.len();
        if removed > 0 {
            self.write_list(&Request::Shopping, items.as_slice()).await?;
        }
        Ok(removed)
    }

    async fn generate_meal_plan(&self, request: &MealPlanRequest) -> Result<Vec<MealPlan>> {
        Err(Error::backend(format!(
            "{} {} for week of {} needs a live backend",
            Request::GenerateMealPlan.method(),
            Request::GenerateMealPlan.path(),
            request.week_start
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BILLS: &str = r#"{"bills": [
        {"id": "b1", "name": "Power", "amount": 120.5, "dueDate": "2024-03-12",
         "category": "utilities", "status": "pending"},
        {"id": "b2", "name": "Rent", "amount": 1800, "dueDate": "2024-03-01",
         "category": "housing", "status": "paid"}
    ]}"#;

    const EVENTS: &str = r#"{"events": [
        {"id": "e1", "title": "Dentist", "start": "2024-03-11T15:00:00Z"},
        {"id": "e2", "title": "Soccer", "start": "2024-03-09T10:00:00"},
        {"id": "e3", "title": "Recital", "start": "2024-03-14T18:30:00"},
        {"id": "e4", "title": "Trip", "startTime": "2024-03-20", "allDay": true}
    ]}"#;

    const SHOPPING: &str = r#"{"items": [
        {"id": "s1", "name": "Milk", "category": "dairy", "checked": true},
        {"id": "s2", "name": "Bread", "category": "bakery"}
    ]}"#;

    fn fixture() -> (TempDir, SnapshotBackend) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bills.json"), BILLS).unwrap();
        std::fs::write(dir.path().join("events.json"), EVENTS).unwrap();
        std::fs::write(dir.path().join("shopping.json"), SHOPPING).unwrap();
        std::fs::write(
            dir.path().join("health.json"),
            r#"{"status": "degraded", "uptime": 3600, "modules": {}}"#,
        )
        .unwrap();
        let backend = SnapshotBackend::new(dir.path(), Zone::utc());
        (dir, backend)
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_request_paths() {
        let events = Request::Events {
            start: at("2024-03-10T00:00:00Z"),
            end: at("2024-03-17T00:00:00Z"),
        };
        assert_eq!(
            events.path(),
            "/api/calendar/events?start=2024-03-10T00%3A00%3A00Z&end=2024-03-17T00%3A00%3A00Z"
        );
        assert_eq!(
            Request::PayBill {
                id: "b 1/x".to_string()
            }
            .path(),
            "/api/bills/b%201%2Fx/pay"
        );
        assert_eq!(Request::RemoveItem { id: "s1".into() }.method(), "DELETE");
        assert_eq!(Request::Bills.method(), "GET");
        assert!(Request::ClearChecked.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_reads_snapshot_files() {
        let (_dir, backend) = fixture();
        let bills = backend.bills().await.unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(backend.health().await.unwrap().uptime_hours(), 1);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_backend_error() {
        let (_dir, backend) = fixture();
        assert!(matches!(backend.chores().await, Err(Error::Backend(_))));
    }

    #[tokio::test]
    async fn test_events_window_is_half_open() {
        let (_dir, backend) = fixture();
        let events = backend
            .events(at("2024-03-10T00:00:00Z"), at("2024-03-17T00:00:00Z"))
            .await
            .unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3"]);
    }

    #[tokio::test]
    async fn test_upcoming_events_sorted_and_limited() {
        let (_dir, backend) = fixture();
        let events = backend
            .upcoming_events(at("2024-03-10T00:00:00Z"), 2)
            .await
            .unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3"]);
    }

    #[tokio::test]
    async fn test_pay_bill_is_visible_to_later_reads() {
        let (_dir, backend) = fixture();
        let paid = backend.pay_bill("b1").await.unwrap();
        assert!(paid.is_paid());
        assert!(paid.paid_at.is_some());

        let bills = backend.bills().await.unwrap();
        assert!(bills.iter().all(Bill::is_paid));
        assert!(matches!(
            backend.pay_bill("nope").await,
            Err(Error::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_shopping_mutations() {
        let (_dir, backend) = fixture();
        let toggled = backend.toggle_item("s2").await.unwrap();
        assert!(toggled.checked);

        let added = backend
            .add_item(NewShoppingItem::new(
                "Apples",
                crate::models::ShoppingCategory::Produce,
            ))
            .await
            .unwrap();
        assert!(!added.checked);
        assert_eq!(backend.shopping_items().await.unwrap().len(), 3);

        assert_eq!(backend.clear_checked().await.unwrap(), 2);
        let left = backend.shopping_items().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "Apples");

        backend.remove_item(&added.id).await.unwrap();
        assert!(backend.shopping_items().await.unwrap().is_empty());
        assert!(backend.remove_item("s1").await.is_err());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let (dir, backend) = fixture();
        backend.pay_bill("b1").await.unwrap();
        backend.toggle_item("s2").await.unwrap();
        drop(backend);

        let reopened = SnapshotBackend::new(dir.path(), Zone::utc());
        let bills = reopened.bills().await.unwrap();
        assert!(bills.iter().all(Bill::is_paid));
        assert_eq!(bills[0].amount, crate::types::Cents::new(12_050));
        let items = reopened.shopping_items().await.unwrap();
        assert!(items.iter().all(|i| i.checked));

        // the list key wrapper is kept
        let body = std::fs::read_to_string(dir.path().join("bills.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["bills"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_generate_needs_live_backend() {
        let (_dir, backend) = fixture();
        let request = MealPlanRequest {
            week_start: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            preferences: MealPreferences::default(),
        };
        assert!(backend.generate_meal_plan(&request).await.is_err());
    }
}
