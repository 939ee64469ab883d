//! Time bucket keys used by the occupancy tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An `HH:MM` bucket key, kept exactly as written in the table.
///
/// Two keys are equal only if their text is equal; `09:00` and `9:00` are
/// different buckets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TimeOfDay(String);

impl TimeOfDay {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_parts(hour: u32, minute: u32) -> Self {
        Self(format!("{hour:02}:{minute:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric `(hour, minute)` view, if the key is shaped like `H:M`.
    pub fn hour_minute(&self) -> Option<(u32, u32)> {
        let (hour, minute) = self.0.split_once(':')?;
        let hour = hour.trim().parse().ok()?;
        let minute = minute.trim().parse().ok()?;
        Some((hour, minute))
    }

    /// Strictly earlier than `other`. Keys without a numeric view are never
    /// earlier than anything.
    pub fn is_before(&self, other: &TimeOfDay) -> bool {
        match (self.hour_minute(), other.hour_minute()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TimeOfDay {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Width of a time bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u32", into = "u32")]
pub enum Granularity {
    Hourly,
    HalfHourly,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Hourly
    }
}

impl Granularity {
    pub fn minutes(&self) -> u32 {
        match self {
            Granularity::Hourly => 60,
            Granularity::HalfHourly => 30,
        }
    }
}

impl TryFrom<u32> for Granularity {
    type Error = String;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            60 => Ok(Granularity::Hourly),
            30 => Ok(Granularity::HalfHourly),
            other => Err(format!(
                "unsupported granularity {other} minutes (expected 60 or 30)"
            )),
        }
    }
}

impl From<Granularity> for u32 {
    fn from(granularity: Granularity) -> Self {
        granularity.minutes()
    }
}
