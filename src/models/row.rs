//! Parsed occupancy table rows.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::{AreaKey, TimeOfDay};

/// A single table cell: an integer percentage, or the marker left behind
/// when the cell could not be read as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Percent(i64),
    NotANumber,
}

impl Occupancy {
    /// Reads a cell the way the dashboard always has: optional sign followed
    /// by leading ASCII digits, anything after the digits ignored.
    /// `"45"` → 45, `"45%"` → 45, `"4.7"` → 4, `"abc"` → NotANumber.
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        let (negative, digits) = match cell.as_bytes().first() {
            Some(b'-') => (true, &cell[1..]),
            Some(b'+') => (false, &cell[1..]),
            _ => (false, cell),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return Occupancy::NotANumber;
        }

        let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
        Occupancy::Percent(if negative { -magnitude } else { magnitude })
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Occupancy::Percent(value) => Some(*value),
            Occupancy::NotANumber => None,
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupancy::Percent(value) => write!(f, "{value}"),
            Occupancy::NotANumber => f.write_str("NaN"),
        }
    }
}

impl Serialize for Occupancy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Occupancy::Percent(value) => serializer.serialize_i64(*value),
            Occupancy::NotANumber => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Occupancy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Option<i64> = Option::deserialize(deserializer)?;
        Ok(value.map_or(Occupancy::NotANumber, Occupancy::Percent))
    }
}

/// One line of the historical table. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyRow {
    pub time: TimeOfDay,
    pub values: BTreeMap<AreaKey, Occupancy>,
}

impl OccupancyRow {
    pub fn new(time: TimeOfDay, values: BTreeMap<AreaKey, Occupancy>) -> Self {
        Self { time, values }
    }

    /// Cell for `area`; areas the row has no column for read as NotANumber.
    pub fn value(&self, area: AreaKey) -> Occupancy {
        self.values
            .get(&area)
            .copied()
            .unwrap_or(Occupancy::NotANumber)
    }
}
