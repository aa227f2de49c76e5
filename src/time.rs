//! Timestamps and calendar-day normalization.
//!
//! Backend records carry either absolute instants (`2024-03-10T14:00:00Z`)
//! or floating wall-clock values (`2024-03-10T09:30:00`, `2024-03-10`).
//! A [`Zone`] turns both into calendar days of the household timezone,
//! which is the only notion of "day" the rest of the crate uses.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Formats accepted for timestamps without an offset.
const FLOATING_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A point in time as received from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timestamp {
    /// An instant with a known offset.
    Absolute(DateTime<FixedOffset>),
    /// A wall-clock time in the household zone.
    Floating(NaiveDateTime),
}

impl Timestamp {
    /// Floating midnight on the given day.
    #[must_use]
    pub fn on_day(day: NaiveDate) -> Self {
        Self::Floating(day.and_time(NaiveTime::MIN))
    }

    /// Floating wall-clock time.
    #[must_use]
    pub const fn floating(at: NaiveDateTime) -> Self {
        Self::Floating(at)
    }

    /// Absolute UTC instant.
    #[must_use]
    pub fn utc(at: DateTime<Utc>) -> Self {
        Self::Absolute(at.fixed_offset())
    }

    /// Whether the wire value carried only a date.
    #[must_use]
    pub fn is_date_only(&self) -> bool {
        matches!(self, Self::Floating(at) if at.time() == NaiveTime::MIN)
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(Error::InvalidTimestamp("empty timestamp".to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::Absolute(dt));
        }

        for format in FLOATING_FORMATS {
            if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self::Floating(at));
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Self::on_day)
            .map_err(|_| Error::InvalidTimestamp(raw.to_string()))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Floating(at) if at.time() == NaiveTime::MIN => {
                write!(f, "{}", at.format("%Y-%m-%d"))
            }
            Self::Floating(at) => write!(f, "{}", at.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// The household timezone used for every day-equality comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    tz: Tz,
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}

impl Zone {
    /// Wrap a parsed timezone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The UTC zone.
    #[must_use]
    pub const fn utc() -> Self {
        Self { tz: chrono_tz::UTC }
    }

    /// Parse an IANA timezone id such as `America/Chicago`.
    pub fn parse(id: &str) -> Result<Self> {
        let trimmed = id.trim();
        trimmed
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|_| Error::UnknownTimezone(trimmed.to_string()))
    }

    /// The zone the host system is configured with, falling back to UTC.
    #[must_use]
    pub fn system() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(id) => Self::parse(&id).unwrap_or_else(|err| {
                warn!("System timezone not recognised ({err}); using UTC");
                Self::utc()
            }),
            Err(err) => {
                warn!("Could not determine system timezone ({err}); using UTC");
                Self::utc()
            }
        }
    }

    /// The underlying timezone.
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.tz
    }

    /// IANA name of the zone.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Calendar day of a timestamp in this zone, time-of-day discarded.
    #[must_use]
    pub fn calendar_day(&self, ts: &Timestamp) -> NaiveDate {
        match ts {
            Timestamp::Absolute(dt) => dt.with_timezone(&self.tz).date_naive(),
            Timestamp::Floating(at) => at.date(),
        }
    }

    /// Absolute instant of a timestamp.
    ///
    /// Floating values are resolved in this zone; an ambiguous wall time
    /// takes the earliest instant, a wall time skipped by a DST gap is
    /// read as UTC.
    #[must_use]
    pub fn instant(&self, ts: &Timestamp) -> DateTime<Utc> {
        match ts {
            Timestamp::Absolute(dt) => dt.with_timezone(&Utc),
            Timestamp::Floating(at) => self.resolve_local(*at),
        }
    }

    /// Wall-clock time of a timestamp in this zone.
    #[must_use]
    pub fn local_time(&self, ts: &Timestamp) -> NaiveDateTime {
        match ts {
            Timestamp::Absolute(dt) => dt.with_timezone(&self.tz).naive_local(),
            Timestamp::Floating(at) => *at,
        }
    }

    /// Calendar day of `now` in this zone.
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// First instant of a calendar day in this zone.
    #[must_use]
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.resolve_local(day.and_time(NaiveTime::MIN))
    }

    fn resolve_local(&self, at: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&at) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(first, second) => {
                debug!(%at, zone = self.name(), "ambiguous local time; using earliest");
                first.min(second).with_timezone(&Utc)
            }
            LocalResult::None => {
                debug!(%at, zone = self.name(), "local time falls in a DST gap; reading as UTC");
                Utc.from_utc_datetime(&at)
            }
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
