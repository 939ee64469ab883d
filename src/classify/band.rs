use serde::{Deserialize, Serialize};

/// Inclusive upper bound of the Low band.
pub const LOW_MAX: i64 = 50;
/// Inclusive upper bound of the Medium band.
pub const MEDIUM_MAX: i64 = 80;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Band {
    Low,
    Medium,
    High,
}

impl Band {
    /// Out-of-range input is not clamped: negatives land in Low and anything
    /// above 100 lands in High.
    pub fn of(percentage: i64) -> Self {
        if percentage <= LOW_MAX {
            Band::Low
        } else if percentage <= MEDIUM_MAX {
            Band::Medium
        } else {
            Band::High
        }
    }
}
