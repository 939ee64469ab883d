use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{AreaKey, Occupancy, OccupancyRow, TimeOfDay};

const ENABLE_LOGS: bool = false;

use crate::log_debug;

const DELIMITER: char = ',';

/// Column layout of the historical table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TableLayout {
    /// `time,occupancy`
    SingleSeries,
    /// `time,main,southEast,north,south,angdomen,newton`
    #[default]
    MultiSeries,
}

impl TableLayout {
    /// Areas in the positional order of columns 1.. of the layout.
    pub fn areas(&self) -> &'static [AreaKey] {
        match self {
            TableLayout::SingleSeries => &[AreaKey::Occupancy],
            TableLayout::MultiSeries => &AreaKey::GALLERIES,
        }
    }
}

/// Parses the comma-delimited occupancy table.
///
/// The first line is a header and is dropped without looking at its column
/// names. Blank lines are skipped. Fields are trimmed, column 0 is the time
/// key and the remaining columns map positionally onto `layout`'s areas.
/// Cells that are not integers, and columns a short line is missing, become
/// [`Occupancy::NotANumber`]; parsing itself never fails.
pub fn parse_table(text: &str, layout: TableLayout) -> Vec<OccupancyRow> {
    let areas = layout.areas();

    let rows: Vec<OccupancyRow> = text
        .split('\n')
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.split(DELIMITER).map(str::trim);
            let time = TimeOfDay::new(fields.next().unwrap_or_default());

            let values: BTreeMap<AreaKey, Occupancy> = areas
                .iter()
                .map(|area| {
                    let cell = fields.next().map_or(Occupancy::NotANumber, Occupancy::parse);
                    (*area, cell)
                })
                .collect();

            OccupancyRow::new(time, values)
        })
        .collect();

    log_debug!("parsed {} occupancy rows ({:?})", rows.len(), layout);
    rows
}
