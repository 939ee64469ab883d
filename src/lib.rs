pub mod classify;
pub mod dashboard;
pub mod error;
pub mod feeds;
pub mod models;
pub mod settings;
pub mod slots;
pub mod table;
pub mod utils;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::time::{self, Duration};

pub use classify::{classify, Band, Classification, ColorPolicy, Rgb};
pub use dashboard::{DashboardConfig, DashboardController, DashboardSources, DashboardView, LoadStatus};
pub use error::{FeedError, LoadError};
pub use models::{AreaKey, Granularity, Occupancy, OccupancyRow, RealtimeSnapshot, TimeOfDay};
pub use settings::DashboardSettings;
pub use table::{ComparisonTable, OccupancyTable, TableLayout};

const SETTINGS_ENV: &str = "OCCUPANCY_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "occupancy.json";

pub fn run() {
    utils::logging::init();

    info!("occupancy dashboard starting up...");

    let result = (|| -> Result<()> {
        let settings_path = std::env::var(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));
        let mut settings = DashboardSettings::load(&settings_path)?;
        settings.apply_env()?;

        let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
        runtime.block_on(serve(settings))
    })();

    if let Err(err) = result {
        error!("occupancy dashboard failed: {err:?}");
        std::process::exit(1);
    }
}

/// Runs the dashboard until ctrl-c, logging each frame that differs from
/// the previous one.
async fn serve(settings: DashboardSettings) -> Result<()> {
    let config = settings.config()?;
    let mut controller = DashboardController::new(config, settings.sources())?
        .with_refresh_interval(settings.refresh_interval());
    controller.start().await?;

    let mut ticker = time::interval(Duration::from_secs(1));
    let mut last: Option<DashboardView> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let view = controller.view().await;
                if last.as_ref() != Some(&view) {
                    log_view(&view);
                    last = Some(view);
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                info!("shutting down");
                break;
            }
        }
    }

    controller.stop().await
}

fn log_view(view: &DashboardView) {
    match &view.status {
        LoadStatus::Failed(message) => error!("{message}"),
        LoadStatus::Loading => info!("loading occupancy data..."),
        LoadStatus::Ready => {
            let slot = view
                .current_key
                .as_ref()
                .map(|key| key.to_string())
                .unwrap_or_else(|| "-".into());
            for card in &view.cards {
                info!(
                    "[{slot}] {}: {}% ({:?}, {})",
                    card.title, card.occupancy, card.classification.band, card.classification.color
                );
            }
            if let Some(weather) = &view.weather {
                info!("weather: {:.1}°C {:?}", weather.temp_c, weather.icon);
            }
        }
    }
}
