use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::classify::ColorPolicy;
use crate::models::{AreaKey, Granularity};
use crate::table::TableLayout;

/// What used to differ between the copy-pasted dashboard variants: which
/// areas get a card, how wide a time bucket is and how percentages are
/// colored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub layout: TableLayout,
    pub areas: Vec<AreaKey>,
    pub granularity: Granularity,
    pub color_policy: ColorPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            layout: TableLayout::MultiSeries,
            areas: AreaKey::GALLERIES.to_vec(),
            granularity: Granularity::HalfHourly,
            color_policy: ColorPolicy::Discrete,
        }
    }
}

impl DashboardConfig {
    /// Single-series variant: one `occupancy` column, hourly buckets.
    pub fn single_series() -> Self {
        Self {
            layout: TableLayout::SingleSeries,
            areas: vec![AreaKey::Occupancy],
            granularity: Granularity::Hourly,
            color_policy: ColorPolicy::Discrete,
        }
    }

    /// Every area must be a column of the layout.
    pub fn validate(&self) -> Result<()> {
        if self.areas.is_empty() {
            bail!("at least one area must be configured");
        }
        let columns = self.layout.areas();
        if let Some(area) = self.areas.iter().find(|area| !columns.contains(area)) {
            bail!("area '{area}' is not a column of the {:?} layout", self.layout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        DashboardConfig::default().validate().unwrap();
        DashboardConfig::single_series().validate().unwrap();
    }

    #[test]
    fn rejects_areas_outside_layout() {
        let config = DashboardConfig {
            areas: vec![AreaKey::Newton],
            ..DashboardConfig::single_series()
        };
        assert!(config.validate().is_err());

        let config = DashboardConfig {
            areas: Vec::new(),
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
