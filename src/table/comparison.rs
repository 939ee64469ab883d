//! Real-vs-predicted comparison table.
//!
//! Unlike the historical table this one is keyed by its header: every data
//! line becomes a map from column name to cell, and columns are looked up by
//! name (`Time`, `Occupancy_main_real`, `Occupancy_main_predicted`, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::AreaKey;

pub const TIME_COLUMN: &str = "Time";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numeric if the trimmed cell reads as a finite number, otherwise the
    /// original text. Blank cells read as 0.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Number(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Cell::Number(number),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(number) => Some(*number),
            Cell::Text(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Number(number) => number.to_string(),
            Cell::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SeriesKind {
    Real,
    Predicted,
}

impl SeriesKind {
    fn suffix(&self) -> &'static str {
        match self {
            SeriesKind::Real => "real",
            SeriesKind::Predicted => "predicted",
        }
    }
}

pub fn column_name(area: AreaKey, kind: SeriesKind) -> String {
    format!("Occupancy_{}_{}", area.as_str(), kind.suffix())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPoint {
    pub time: String,
    pub value: Option<f64>,
}

/// How far yesterday's prediction was from what actually happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionError {
    /// Mean absolute error in percentage points.
    pub mean_abs_error: f64,
    /// Mean absolute percentage error over points with a non-zero real value.
    pub mape: Option<f64>,
    pub samples: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTable {
    pub headers: Vec<String>,
    pub rows: Vec<BTreeMap<String, Cell>>,
}

impl ComparisonTable {
    /// Blank lines are dropped before the header is taken, so leading blank
    /// lines do not shift it. Lines shorter than the header omit the missing
    /// columns; extra fields are ignored.
    pub fn parse(text: &str) -> Self {
        let mut lines = text
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty());

        let Some(header_line) = lines.next() else {
            return Self::default();
        };
        let headers: Vec<String> = header_line
            .split(',')
            .map(|name| name.trim().to_string())
            .collect();

        let rows = lines
            .map(|line| {
                headers
                    .iter()
                    .zip(line.split(','))
                    .map(|(name, raw)| (name.clone(), Cell::coerce(raw)))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn series(&self, area: AreaKey, kind: SeriesKind) -> Vec<ComparisonPoint> {
        let column = column_name(area, kind);
        self.rows
            .iter()
            .map(|row| ComparisonPoint {
                time: row.get(TIME_COLUMN).map(Cell::display).unwrap_or_default(),
                value: row.get(&column).and_then(Cell::as_number),
            })
            .collect()
    }

    /// Error of the predicted series against the real one for `area`, over
    /// rows where both are numeric. `None` when no row qualifies.
    pub fn prediction_error(&self, area: AreaKey) -> Option<PredictionError> {
        let real_column = column_name(area, SeriesKind::Real);
        let predicted_column = column_name(area, SeriesKind::Predicted);

        let pairs: Vec<(f64, f64)> = self
            .rows
            .iter()
            .filter_map(|row| {
                let real = row.get(&real_column)?.as_number()?;
                let predicted = row.get(&predicted_column)?.as_number()?;
                Some((real, predicted))
            })
            .collect();

        if pairs.is_empty() {
            return None;
        }

        let mean_abs_error = pairs
            .iter()
            .map(|(real, predicted)| (real - predicted).abs())
            .sum::<f64>()
            / pairs.len() as f64;

        let relative: Vec<f64> = pairs
            .iter()
            .filter(|(real, _)| *real != 0.0)
            .map(|(real, predicted)| ((real - predicted) / real).abs() * 100.0)
            .collect();
        let mape = if relative.is_empty() {
            None
        } else {
            Some(relative.iter().sum::<f64>() / relative.len() as f64)
        };

        Some(PredictionError {
            mean_abs_error,
            mape,
            samples: pairs.len(),
        })
    }
}

/// Which area's real/predicted pair is drawn. At most one area is visible:
/// toggling an area flips it and hides every other area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AreaToggle {
    visible: BTreeMap<AreaKey, bool>,
}

impl Default for AreaToggle {
    fn default() -> Self {
        Self::new(&AreaKey::GALLERIES, AreaKey::Main)
    }
}

impl AreaToggle {
    pub fn new(areas: &[AreaKey], initially_visible: AreaKey) -> Self {
        let visible = areas
            .iter()
            .map(|area| (*area, *area == initially_visible))
            .collect();
        Self { visible }
    }

    pub fn toggle(&mut self, area: AreaKey) {
        for (key, shown) in self.visible.iter_mut() {
            *shown = *key == area && !*shown;
        }
    }

    pub fn is_visible(&self, area: AreaKey) -> bool {
        self.visible.get(&area).copied().unwrap_or(false)
    }

    pub fn visible_areas(&self) -> Vec<AreaKey> {
        self.visible
            .iter()
            .filter(|(_, shown)| **shown)
            .map(|(area, _)| *area)
            .collect()
    }
}
