//! # Hearth
//!
//! Household dashboard core: bills, chores, calendar, meals, medical and
//! shopping views derived from a household-automation backend.
//!
//! This crate provides:
//! - Timezone-aware calendar periods and day bucketing
//! - Display-status classification from raw status and due date
//! - Grouped summaries (category totals, member points, status counts)
//! - A backend contract with a JSON snapshot implementation
//! - A poller that keeps the live dashboard panels fresh

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod bucket;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod period;
pub mod poll;
pub mod source;
pub mod status;
pub mod time;
pub mod types;
pub mod views;

pub use config::Config;
pub use error::{Error, Result};
pub use period::{Period, PeriodKind};
pub use source::{Backend, SnapshotBackend};
pub use time::{Timestamp, Zone};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "hearth";
