use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::classify::ColorPolicy;
use crate::dashboard::{DashboardConfig, DashboardSources};
use crate::feeds::{rest_url, SnapshotSource, TableSource, WeatherSettings};
use crate::models::{AreaKey, Granularity};
use crate::table::TableLayout;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const DEFAULT_TABLE_URL: &str =
    "https://huggingface.co/datasets/davnas/library-occupancy/raw/main/data_2.csv";
pub const DEFAULT_COMPARISON_URL: &str =
    "https://huggingface.co/datasets/davnas/library-occupancy/resolve/main/Real_vs_Predicted_Occupancy_Data.csv";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotSettings {
    /// Realtime database base URL. No live feed without one.
    pub database_url: Option<String>,
    pub path: String,
    pub auth_token: Option<String>,
    pub poll_interval_secs: u64,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            path: "current-occupancy".into(),
            auth_token: None,
            poll_interval_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSettings {
    pub table_location: String,
    pub layout: TableLayout,
    pub areas: Vec<AreaKey>,
    pub granularity_minutes: u32,
    pub color_policy: ColorPolicy,
    pub refresh_interval_secs: u64,
    pub comparison_location: Option<String>,
    pub snapshot: SnapshotSettings,
    pub weather: WeatherSettings,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            table_location: DEFAULT_TABLE_URL.into(),
            layout: TableLayout::MultiSeries,
            areas: AreaKey::GALLERIES.to_vec(),
            granularity_minutes: 30,
            color_policy: ColorPolicy::Discrete,
            refresh_interval_secs: 60,
            comparison_location: Some(DEFAULT_COMPARISON_URL.into()),
            snapshot: SnapshotSettings::default(),
            weather: WeatherSettings::default(),
        }
    }
}

impl DashboardSettings {
    /// Reads settings from `path` if it exists. A file that is not valid
    /// settings JSON falls back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
            log_warn!("ignoring malformed settings in {}: {err}", path.display());
            Self::default()
        }))
    }

    /// Applies `OCCUPANCY_*` environment variables on top of the file.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(location) = lookup("OCCUPANCY_TABLE_URL") {
            self.table_location = location;
        }
        if let Some(location) = lookup("OCCUPANCY_COMPARISON_URL") {
            self.comparison_location = Some(location).filter(|l| !l.is_empty());
        }
        if let Some(url) = lookup("OCCUPANCY_SNAPSHOT_DATABASE_URL") {
            self.snapshot.database_url = Some(url);
        }
        if let Some(token) = lookup("OCCUPANCY_SNAPSHOT_AUTH") {
            self.snapshot.auth_token = Some(token);
        }
        if let Some(key) = lookup("OCCUPANCY_WEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        if let Some(location) = lookup("OCCUPANCY_WEATHER_LOCATION") {
            self.weather.location = location;
        }
        if let Some(minutes) = lookup("OCCUPANCY_GRANULARITY_MINUTES") {
            self.granularity_minutes = minutes
                .trim()
                .parse()
                .with_context(|| format!("invalid OCCUPANCY_GRANULARITY_MINUTES '{minutes}'"))?;
        }
        if let Some(policy) = lookup("OCCUPANCY_COLOR_POLICY") {
            self.color_policy = match policy.trim() {
                "discrete" => ColorPolicy::Discrete,
                "continuous" => ColorPolicy::Continuous,
                other => return Err(anyhow!("invalid OCCUPANCY_COLOR_POLICY '{other}'")),
            };
        }
        Ok(())
    }

    pub fn config(&self) -> Result<DashboardConfig> {
        let granularity = Granularity::try_from(self.granularity_minutes).map_err(|err| anyhow!(err))?;
        let config = DashboardConfig {
            layout: self.layout,
            areas: self.areas.clone(),
            granularity,
            color_policy: self.color_policy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Feed sources described by these settings. The live feed and the
    /// weather feed are only wired when their credentials are present.
    pub fn sources(&self) -> DashboardSources {
        let snapshot = self.snapshot.database_url.as_deref().map(|database_url| {
            SnapshotSource::RestPoll {
                url: rest_url(database_url, &self.snapshot.path),
                auth_token: self.snapshot.auth_token.clone(),
                interval: Duration::from_secs(self.snapshot.poll_interval_secs.max(1)),
                client: reqwest::Client::new(),
            }
        });

        let weather = self
            .weather
            .api_key
            .as_ref()
            .map(|_| self.weather.clone());

        DashboardSources {
            table: TableSource::from_location(&self.table_location),
            comparison: self
                .comparison_location
                .as_deref()
                .map(TableSource::from_location),
            snapshot,
            weather,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = DashboardSettings::load(&temp.path().join("absent.json")).unwrap();
        assert_eq!(settings, DashboardSettings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "layout": "singleSeries", "areas": ["occupancy"], "granularityMinutes": 60, "colorPolicy": "continuous" }"#,
        )
        .unwrap();

        let settings = DashboardSettings::load(&path).unwrap();
        let config = settings.config().unwrap();
        assert_eq!(config.layout, TableLayout::SingleSeries);
        assert_eq!(config.granularity, Granularity::Hourly);
        assert_eq!(config.color_policy, ColorPolicy::Continuous);
        assert_eq!(settings.snapshot.path, "current-occupancy");
        assert_eq!(settings.table_location, DEFAULT_TABLE_URL);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(DashboardSettings::load(&path).unwrap(), DashboardSettings::default());
    }

    #[test]
    fn unsupported_granularity_is_rejected() {
        let settings = DashboardSettings {
            granularity_minutes: 15,
            ..DashboardSettings::default()
        };
        assert!(settings.config().is_err());
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OCCUPANCY_TABLE_URL", "/srv/occupancy.csv"),
            ("OCCUPANCY_COMPARISON_URL", ""),
            ("OCCUPANCY_WEATHER_API_KEY", "from-env"),
            ("OCCUPANCY_SNAPSHOT_DATABASE_URL", "https://db.example"),
            ("OCCUPANCY_SNAPSHOT_AUTH", "db-token"),
            ("OCCUPANCY_GRANULARITY_MINUTES", "60"),
            ("OCCUPANCY_COLOR_POLICY", "continuous"),
        ]);
        let mut settings = DashboardSettings::default();
        settings
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.weather.api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.granularity_minutes, 60);
        assert_eq!(settings.color_policy, ColorPolicy::Continuous);
        assert!(settings.comparison_location.is_none());

        let sources = settings.sources();
        assert_eq!(sources.table, TableSource::File("/srv/occupancy.csv".into()));
        assert!(sources.comparison.is_none());
        assert!(sources.weather.is_some());
        match sources.snapshot {
            Some(SnapshotSource::RestPoll { url, auth_token, .. }) => {
                assert_eq!(url, "https://db.example/current-occupancy.json");
                assert_eq!(auth_token.as_deref(), Some("db-token"));
            }
            _ => panic!("expected a polling snapshot source"),
        }
    }

    #[test]
    fn invalid_override_is_an_error() {
        let mut settings = DashboardSettings::default();
        assert!(settings
            .apply_overrides(|name| (name == "OCCUPANCY_COLOR_POLICY").then(|| "rainbow".to_string()))
            .is_err());
        assert!(settings
            .apply_overrides(|name| (name == "OCCUPANCY_GRANULARITY_MINUTES").then(|| "half".to_string()))
            .is_err());
    }

    #[test]
    fn credentials_absent_means_no_live_or_weather_feed() {
        let sources = DashboardSettings::default().sources();
        assert!(sources.snapshot.is_none());
        assert!(sources.weather.is_none());
        assert!(matches!(sources.table, TableSource::Http(_)));
    }
}
