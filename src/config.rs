//! Configuration management for hearth

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::status::UrgencyThreshold;
use crate::time::Zone;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Where backend responses come from
    pub backend: BackendConfig,

    /// Urgency thresholds and look-ahead windows
    pub urgency: UrgencyConfig,

    /// Refresh intervals
    pub polling: PollingConfig,

    /// Terminal output
    pub display: DisplayConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Household timezone as an IANA id (default: system zone)
    pub timezone: Option<String>,

    /// Data directory (default: ~/.local/share/hearth)
    pub data_dir: Option<PathBuf>,
}

/// Backend settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Directory of JSON response snapshots (default: `<data_dir>/snapshots`)
    pub snapshot_dir: Option<PathBuf>,
}

/// Day thresholds used when classifying records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyConfig {
    /// Bills due within this many days are urgent
    pub bills_days: u32,

    /// Chores due within this many days are urgent
    pub chores_days: u32,

    /// Appointments within this many days are urgent
    pub medical_days: u32,

    /// Days ahead counted as "upcoming" on summary cards
    pub upcoming_window_days: u32,

    /// Medications whose refill falls within this many days need a refill
    pub refill_window_days: u32,
}

/// Refresh intervals in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Family presence and counts
    pub family_secs: u64,

    /// Upcoming events sidebar
    pub events_secs: u64,

    /// Backend health
    pub health_secs: u64,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows in "upcoming" lists
    pub upcoming_limit: usize,

    /// Prefix for money amounts
    pub currency_symbol: String,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            timezone: None,
            data_dir: None,
        }
    }
}

impl Default for UrgencyConfig {
    fn default() -> Self {
        Self {
            bills_days: UrgencyThreshold::BILLS.0,
            chores_days: UrgencyThreshold::CHORES.0,
            medical_days: UrgencyThreshold::MEDICAL.0,
            upcoming_window_days: 7,
            refill_window_days: 7,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            family_secs: 30,
            events_secs: 60,
            health_secs: 60,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: 5,
            currency_symbol: "$".to_string(),
        }
    }
}

impl UrgencyConfig {
    #[must_use]
    pub const fn bills(&self) -> UrgencyThreshold {
        UrgencyThreshold(self.bills_days)
    }

    #[must_use]
    pub const fn chores(&self) -> UrgencyThreshold {
        UrgencyThreshold(self.chores_days)
    }

    #[must_use]
    pub const fn medical(&self) -> UrgencyThreshold {
        UrgencyThreshold(self.medical_days)
    }
}

impl PollingConfig {
    #[must_use]
    pub const fn family(&self) -> Duration {
        Duration::from_secs(self.family_secs)
    }

    #[must_use]
    pub const fn events(&self) -> Duration {
        Duration::from_secs(self.events_secs)
    }

    #[must_use]
    pub const fn health(&self) -> Duration {
        Duration::from_secs(self.health_secs)
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(config_dir.join("hearth").join("config.toml"))
    }

    /// Get the data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.general.data_dir {
            Ok(dir.clone())
        } else {
            let data_dir = dirs::data_local_dir()
                .ok_or_else(|| Error::config("Could not determine data directory"))?;
            Ok(data_dir.join("hearth"))
        }
    }

    /// Get the snapshot directory
    pub fn snapshot_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.backend.snapshot_dir {
            return Ok(dir.clone());
        }
        Ok(self.data_dir()?.join("snapshots"))
    }

    /// The household timezone.
    ///
    /// Falls back to the system zone when none is configured.
    pub fn zone(&self) -> Result<Zone> {
        match self.general.timezone.as_deref() {
            Some(id) => Zone::parse(id),
            None => Ok(Zone::system()),
        }
    }

    /// Validate configuration values.
    ///
    /// Call this after loading to ensure all values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.general.log_level
            )));
        }

        if let Some(ref id) = self.general.timezone {
            Zone::parse(id)?;
        }

        let window = self.urgency.upcoming_window_days;
        for (name, days) in [
            ("bills_days", self.urgency.bills_days),
            ("chores_days", self.urgency.chores_days),
            ("medical_days", self.urgency.medical_days),
        ] {
            if days > window {
                return Err(Error::config(format!(
                    "{name} ({days}) should not exceed upcoming_window_days ({window})"
                )));
            }
        }

        for (name, secs) in [
            ("family_secs", self.polling.family_secs),
            ("events_secs", self.polling.events_secs),
            ("health_secs", self.polling.health_secs),
        ] {
            if secs == 0 {
                return Err(Error::config(format!("{name} must be greater than 0")));
            }
        }

        if self.display.upcoming_limit == 0 {
            return Err(Error::config("upcoming_limit must be greater than 0"));
        }

        Ok(())
    }
}
