use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{classify, Classification, Rgb};
use crate::error::LoadError;
use crate::feeds::{CurrentWeather, WeatherIcon};
use crate::models::{AreaKey, Occupancy, OccupancyRow, RealtimeSnapshot, TimeOfDay};
use crate::slots::{current_key, select, slot_color};
use crate::table::{AreaToggle, ComparisonTable, OccupancyTable, PredictionError, SeriesKind};
use crate::table::comparison::ComparisonPoint;

use super::DashboardConfig;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "state", content = "message")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarView {
    pub time: TimeOfDay,
    pub occupancy: Occupancy,
    pub color: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AreaCard {
    pub area: AreaKey,
    pub title: String,
    pub occupancy: i64,
    pub classification: Classification,
    pub bars: Vec<BarView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherView {
    pub temp_c: f64,
    pub text: Option<String>,
    pub icon: WeatherIcon,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeries {
    pub area: AreaKey,
    pub real: Vec<ComparisonPoint>,
    pub predicted: Vec<ComparisonPoint>,
    pub error: Option<PredictionError>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: LoadStatus,
    pub current_key: Option<TimeOfDay>,
    pub cards: Vec<AreaCard>,
    pub weather: Option<WeatherView>,
    pub comparison: Vec<ComparisonSeries>,
}

/// Joins the independent feeds. Table, snapshot, weather and comparison
/// updates may arrive in any order; each one only touches its own slice.
///
/// Live snapshots win over the table: the current table row only seeds the
/// card values until the first live push has been seen.
#[derive(Debug, Clone)]
pub struct DashboardState {
    config: DashboardConfig,
    status: LoadStatus,
    table: OccupancyTable,
    current_key: Option<TimeOfDay>,
    realtime: RealtimeSnapshot,
    live_received: bool,
    comparison: Option<ComparisonTable>,
    comparison_toggle: AreaToggle,
    weather: Option<CurrentWeather>,
}

impl DashboardState {
    pub fn new(config: DashboardConfig) -> Self {
        let initially_visible = config.areas.first().copied().unwrap_or(AreaKey::Main);
        let comparison_toggle = AreaToggle::new(&config.areas, initially_visible);
        Self {
            config,
            status: LoadStatus::Loading,
            table: OccupancyTable::default(),
            current_key: None,
            realtime: RealtimeSnapshot::default(),
            live_received: false,
            comparison: None,
            comparison_toggle,
            weather: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn current_key(&self) -> Option<&TimeOfDay> {
        self.current_key.as_ref()
    }

    pub fn realtime(&self) -> &RealtimeSnapshot {
        &self.realtime
    }

    pub fn apply_table<T: Timelike>(&mut self, result: Result<OccupancyTable, LoadError>, now: &T) {
        match result {
            Ok(table) => {
                log_info!("occupancy table loaded with {} rows", table.len());
                self.table = table;
                self.status = LoadStatus::Ready;
                self.refresh(now);
            }
            Err(err) => {
                log_error!("occupancy table load failed: {err}");
                self.table = OccupancyTable::default();
                self.current_key = None;
                self.status = LoadStatus::Failed(err.user_message());
            }
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: RealtimeSnapshot) {
        self.realtime = snapshot;
        self.live_received = true;
    }

    pub fn apply_comparison(&mut self, comparison: ComparisonTable) {
        self.comparison = Some(comparison);
    }

    pub fn apply_weather(&mut self, weather: CurrentWeather) {
        self.weather = Some(weather);
    }

    pub fn toggle_comparison_area(&mut self, area: AreaKey) {
        self.comparison_toggle.toggle(area);
    }

    /// Recomputes the current bucket for `now`. Returns whether it moved.
    ///
    /// When the bucket has no row the previous card values stay in place.
    pub fn refresh<T: Timelike>(&mut self, now: &T) -> bool {
        if self.status != LoadStatus::Ready {
            return false;
        }

        let key = current_key(now, self.config.granularity);
        let changed = self.current_key.as_ref() != Some(&key);

        if !self.live_received {
            if let Some(row) = select(&self.table.rows, &key) {
                self.realtime = RealtimeSnapshot::from_row(row, &self.config.areas, Utc::now());
            }
        }

        self.current_key = Some(key);
        changed
    }

    pub fn current_row(&self) -> Option<&OccupancyRow> {
        let key = self.current_key.as_ref()?;
        select(&self.table.rows, key)
    }

    pub fn view(&self) -> DashboardView {
        if let LoadStatus::Failed(_) = self.status {
            return DashboardView {
                status: self.status.clone(),
                current_key: None,
                cards: Vec::new(),
                weather: None,
                comparison: Vec::new(),
            };
        }

        let cards = self
            .config
            .areas
            .iter()
            .map(|area| self.card(*area))
            .collect();

        let weather = self.weather.as_ref().map(|weather| WeatherView {
            temp_c: weather.temp_c,
            text: weather.condition.as_ref().map(|c| c.text.clone()),
            icon: weather.icon(),
        });

        let comparison = match &self.comparison {
            Some(table) => self
                .comparison_toggle
                .visible_areas()
                .into_iter()
                .map(|area| ComparisonSeries {
                    area,
                    real: table.series(area, SeriesKind::Real),
                    predicted: table.series(area, SeriesKind::Predicted),
                    error: table.prediction_error(area),
                })
                .collect(),
            None => Vec::new(),
        };

        DashboardView {
            status: self.status.clone(),
            current_key: self.current_key.clone(),
            cards,
            weather,
            comparison,
        }
    }

    fn card(&self, area: AreaKey) -> AreaCard {
        let occupancy = self.realtime.get(area);
        let policy = self.config.color_policy;

        let bars = match &self.current_key {
            Some(key) => self
                .table
                .series(area)
                .into_iter()
                .map(|point| BarView {
                    color: slot_color(&point.time, key, point.occupancy, policy),
                    time: point.time,
                    occupancy: point.occupancy,
                })
                .collect(),
            None => Vec::new(),
        };

        AreaCard {
            area,
            title: area.title().to_string(),
            occupancy,
            classification: classify(occupancy, policy),
            bars,
        }
    }
}
