use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{AreaKey, OccupancyRow};

/// Latest live occupancy per area. Each push replaces the previous snapshot
/// wholesale; areas the push did not carry read as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeSnapshot {
    pub values: BTreeMap<AreaKey, i64>,
    pub received_at: DateTime<Utc>,
}

impl RealtimeSnapshot {
    pub fn new(values: BTreeMap<AreaKey, i64>, received_at: DateTime<Utc>) -> Self {
        Self {
            values,
            received_at,
        }
    }

    /// Builds a snapshot from a pushed JSON record. Returns `None` when the
    /// record is null or not an object, in which case the previous snapshot
    /// stays on screen.
    pub fn from_json(record: &Value, areas: &[AreaKey], received_at: DateTime<Utc>) -> Option<Self> {
        let object = record.as_object()?;

        let values = areas
            .iter()
            .map(|area| {
                let value = object.get(area.as_str()).map(json_percent).unwrap_or(0);
                (*area, value)
            })
            .collect();

        Some(Self::new(values, received_at))
    }

    /// Seeds a snapshot from the table row for the current slot. Cells that
    /// failed to parse seed 0.
    pub fn from_row(row: &OccupancyRow, areas: &[AreaKey], received_at: DateTime<Utc>) -> Self {
        let values = areas
            .iter()
            .map(|area| (*area, row.value(*area).value().unwrap_or(0)))
            .collect();
        Self::new(values, received_at)
    }

    pub fn get(&self, area: AreaKey) -> i64 {
        self.values.get(&area).copied().unwrap_or(0)
    }
}

fn json_percent(value: &Value) -> i64 {
    if let Some(int) = value.as_i64() {
        return int;
    }
    match value.as_f64() {
        Some(float) if float.is_finite() => float.round() as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Occupancy, TimeOfDay};
    use serde_json::json;

    #[test]
    fn missing_and_non_numeric_fields_default_to_zero() {
        let record = json!({ "main": 42, "north": null, "south": "busy", "newton": 63.6 });
        let snapshot =
            RealtimeSnapshot::from_json(&record, &AreaKey::GALLERIES, Utc::now()).unwrap();

        assert_eq!(snapshot.get(AreaKey::Main), 42);
        assert_eq!(snapshot.get(AreaKey::North), 0);
        assert_eq!(snapshot.get(AreaKey::South), 0);
        assert_eq!(snapshot.get(AreaKey::SouthEast), 0);
        assert_eq!(snapshot.get(AreaKey::Newton), 64);
        assert_eq!(snapshot.values.len(), 6);
    }

    #[test]
    fn null_record_is_ignored() {
        assert!(RealtimeSnapshot::from_json(&Value::Null, &AreaKey::GALLERIES, Utc::now()).is_none());
        assert!(RealtimeSnapshot::from_json(&json!(12), &AreaKey::GALLERIES, Utc::now()).is_none());
    }

    #[test]
    fn seeding_from_row_zeroes_invalid_cells() {
        let row = OccupancyRow::new(
            TimeOfDay::new("10:00"),
            BTreeMap::from([
                (AreaKey::Main, Occupancy::Percent(55)),
                (AreaKey::North, Occupancy::NotANumber),
            ]),
        );
        let snapshot = RealtimeSnapshot::from_row(&row, &[AreaKey::Main, AreaKey::North], Utc::now());
        assert_eq!(snapshot.get(AreaKey::Main), 55);
        assert_eq!(snapshot.get(AreaKey::North), 0);
    }
}
