//! Library areas tracked by the occupancy feeds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named area of the library. The six gallery keys are a closed set and
/// appear in this order in the multi-series table; `Occupancy` is the single
/// implicit series of the two-column table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AreaKey {
    Main,
    SouthEast,
    North,
    South,
    Angdomen,
    Newton,
    Occupancy,
}

impl AreaKey {
    /// Gallery areas in multi-series column order.
    pub const GALLERIES: [AreaKey; 6] = [
        AreaKey::Main,
        AreaKey::SouthEast,
        AreaKey::North,
        AreaKey::South,
        AreaKey::Angdomen,
        AreaKey::Newton,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AreaKey::Main => "main",
            AreaKey::SouthEast => "southEast",
            AreaKey::North => "north",
            AreaKey::South => "south",
            AreaKey::Angdomen => "angdomen",
            AreaKey::Newton => "newton",
            AreaKey::Occupancy => "occupancy",
        }
    }

    /// Card title shown next to the area's chart.
    pub fn title(&self) -> &'static str {
        match self {
            AreaKey::Main => "KTH Library",
            AreaKey::SouthEast => "South-East Gallery",
            AreaKey::North => "North Gallery",
            AreaKey::South => "South Gallery",
            AreaKey::Angdomen => "Ångdomen",
            AreaKey::Newton => "Newton",
            AreaKey::Occupancy => "Occupancy",
        }
    }
}

impl fmt::Display for AreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AreaKey {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "main" => Ok(AreaKey::Main),
            "southEast" => Ok(AreaKey::SouthEast),
            "north" => Ok(AreaKey::North),
            "south" => Ok(AreaKey::South),
            "angdomen" => Ok(AreaKey::Angdomen),
            "newton" => Ok(AreaKey::Newton),
            "occupancy" => Ok(AreaKey::Occupancy),
            _ => Err(anyhow::anyhow!("unknown area key '{value}'")),
        }
    }
}
