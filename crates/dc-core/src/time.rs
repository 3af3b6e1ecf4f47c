//! Lightweight date utilities (no chrono dependency).
//!
//! Uses Howard Hinnant's civil_from_days / days_from_civil algorithms for
//! Unix-to-date conversion. Local days are derived from a fixed UTC offset.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const SECS_PER_DAY: i64 = 86_400;

/// Current UTC time as Unix seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Current UTC timestamp in ISO-8601 format.
pub fn now_iso8601() -> String {
    unix_to_iso8601(now_unix_secs())
}

/// Convert Unix seconds to ISO-8601 UTC string.
pub fn unix_to_iso8601(secs: u64) -> String {
    let days = (secs / 86400) as i64;
    let time_of_day = secs % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let (y, m, d) = civil_from_days(days);
    format!("{y:04}-{m:02}-{d:02}T{hours:02}:{minutes:02}:{seconds:02}Z")
}

/// Howard Hinnant's civil_from_days: Unix epoch days → (year, month, day).
fn civil_from_days(days: i64) -> (i64, u64, u64) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

/// Inverse of `civil_from_days`: (year, month, day) → Unix epoch days.
fn days_from_civil(y: i64, m: u64, d: u64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u64;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe as i64 - 719468
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayKeyError(String);

impl fmt::Display for DayKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid day '{}': expected YYYY-MM-DD", self.0)
    }
}

impl std::error::Error for DayKeyError {}

/// A calendar day, rendered as `YYYY-MM-DD`.
///
/// Stored as days since the Unix epoch so ordering and day arithmetic are
/// plain integer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(i64);

impl DayKey {
    /// Local day for `secs` Unix seconds at a fixed UTC offset.
    pub fn from_unix(secs: u64, utc_offset_minutes: i32) -> Self {
        let local = secs as i64 + i64::from(utc_offset_minutes) * 60;
        Self(local.div_euclid(SECS_PER_DAY))
    }

    pub fn today(utc_offset_minutes: i32) -> Self {
        Self::from_unix(now_unix_secs(), utc_offset_minutes)
    }

    pub fn from_ymd(year: i64, month: u64, day: u64) -> Result<Self, DayKeyError> {
        let invalid = || DayKeyError(format!("{year:04}-{month:02}-{day:02}"));
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(invalid());
        }
        let days = days_from_civil(year, month, day);
        // Rejects 02-30 and friends: they normalise to a different date.
        if civil_from_days(days) != (year, month, day) {
            return Err(invalid());
        }
        Ok(Self(days))
    }

    pub fn parse(s: &str) -> Result<Self, DayKeyError> {
        let invalid = || DayKeyError(s.to_string());
        let mut parts = s.split('-');
        let (Some(y), Some(m), Some(d), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(invalid());
        }
        let year: i64 = y.parse().map_err(|_| invalid())?;
        let month: u64 = m.parse().map_err(|_| invalid())?;
        let day: u64 = d.parse().map_err(|_| invalid())?;
        Self::from_ymd(year, month, day).map_err(|_| invalid())
    }

    /// Days since 1970-01-01.
    pub fn epoch_days(self) -> i64 {
        self.0
    }

    pub fn pred(self) -> Self {
        Self(self.0 - 1)
    }

    pub fn succ(self) -> Self {
        Self(self.0 + 1)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(self, other: DayKey) -> i64 {
        other.0 - self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, m, d) = civil_from_days(self.0);
        write!(f, "{y:04}-{m:02}-{d:02}")
    }
}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DayKey {
    type Error = DayKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DayKey> for String {
    fn from(day: DayKey) -> Self {
        day.to_string()
    }
}
