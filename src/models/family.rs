use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A member of the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FamilyMember {
    /// Name to show on cards.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }

    /// "Parent" for parents, "Age N" for children.
    #[must_use]
    pub fn role_label(&self) -> String {
        match self.role {
            Role::Parent => "Parent".to_string(),
            Role::Child => format!("Age {}", self.age),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    #[serde(other)]
    Child,
}

/// Where a member is, as reported by presence detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    #[serde(default)]
    pub is_home: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAppointment {
    pub purpose: String,
    pub date_time: Timestamp,
}

/// One card of the family dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberStatus {
    pub member: FamilyMember,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<Presence>,
    #[serde(default)]
    pub pending_chores: u32,
    #[serde(default)]
    pub upcoming_events: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_appointment: Option<NextAppointment>,
}

impl FamilyMemberStatus {
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.presence.as_ref().is_some_and(|p| p.is_home)
    }
}

/// Overall backend health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    #[serde(other)]
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHealth {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Response of the backend health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    /// Uptime in seconds
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleHealth>,
}

impl SystemHealth {
    /// State shown when the health check itself failed.
    #[must_use]
    pub const fn unhealthy() -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            uptime: 0.0,
            modules: BTreeMap::new(),
        }
    }

    /// Whole hours of uptime.
    #[must_use]
    pub fn uptime_hours(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hours = (self.uptime.max(0.0) / 3600.0).floor() as u64;
        hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_labels() {
        let member: FamilyMember = serde_json::from_str(
            r#"{"id": "m3", "name": "Zoe", "nickname": "Zo", "role": "child", "age": 9}"#,
        )
        .unwrap();
        assert_eq!(member.display_name(), "Zo");
        assert_eq!(member.role_label(), "Age 9");
    }

    #[test]
    fn test_health_uptime_and_fallback() {
        let health: SystemHealth =
            serde_json::from_str(r#"{"status": "healthy", "uptime": 7300, "modules": {}}"#)
                .unwrap();
        assert_eq!(health.uptime_hours(), 2);
        assert_eq!(SystemHealth::unhealthy().status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_presence_defaults_to_away() {
        let status: FamilyMemberStatus = serde_json::from_str(
            r#"{"member": {"id": "m1", "name": "Kyle", "role": "parent", "age": 41}}"#,
        )
        .unwrap();
        assert!(!status.is_home());
        assert_eq!(status.pending_chores, 0);
    }
}
