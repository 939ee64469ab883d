pub mod comparison;
pub mod parser;

pub use comparison::{AreaToggle, Cell, ComparisonTable, PredictionError, SeriesKind};
pub use parser::{parse_table, TableLayout};

use serde::{Deserialize, Serialize};

use crate::models::{AreaKey, Occupancy, OccupancyRow, TimeOfDay};

/// A point of one area's chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub time: TimeOfDay,
    pub occupancy: Occupancy,
}

/// The historical table as loaded, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyTable {
    pub layout: TableLayout,
    pub rows: Vec<OccupancyRow>,
}

impl OccupancyTable {
    pub fn parse(text: &str, layout: TableLayout) -> Self {
        Self {
            layout,
            rows: parse_table(text, layout),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Projects one area out of every row.
    pub fn series(&self, area: AreaKey) -> Vec<SeriesPoint> {
        self.rows
            .iter()
            .map(|row| SeriesPoint {
                time: row.time.clone(),
                occupancy: row.value(area),
            })
            .collect()
    }
}
