use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveTime};
use tokio::{sync::Mutex, task::JoinHandle, time};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::feeds::{
    fetch_current, load_comparison, load_table, SnapshotSource, SnapshotSubscription,
    TableSource, WeatherSettings,
};
use crate::models::AreaKey;

use super::{DashboardConfig, DashboardState, DashboardView, LoadStatus};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const DEFAULT_REFRESH_SECS: u64 = 60;
const HTTP_TIMEOUT_SECS: u64 = 15;

/// Wall clock used to pick the current bucket.
pub type Clock = Arc<dyn Fn() -> NaiveTime + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| Local::now().time())
}

/// Where each feed comes from. Only the table is mandatory.
pub struct DashboardSources {
    pub table: TableSource,
    pub comparison: Option<TableSource>,
    pub snapshot: Option<SnapshotSource>,
    pub weather: Option<WeatherSettings>,
}

impl DashboardSources {
    pub fn table_only(table: TableSource) -> Self {
        Self {
            table,
            comparison: None,
            snapshot: None,
            weather: None,
        }
    }
}

pub struct DashboardController {
    state: Arc<Mutex<DashboardState>>,
    table_source: TableSource,
    comparison_source: Option<TableSource>,
    snapshot_source: Option<SnapshotSource>,
    weather: Option<WeatherSettings>,
    client: reqwest::Client,
    clock: Clock,
    refresh_interval: Duration,
    cancel_token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl DashboardController {
    pub fn new(config: DashboardConfig, sources: DashboardSources) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            state: Arc::new(Mutex::new(DashboardState::new(config))),
            table_source: sources.table,
            comparison_source: sources.comparison,
            snapshot_source: sources.snapshot,
            weather: sources.weather,
            client,
            clock: local_clock(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            cancel_token: CancellationToken::new(),
            tasks: Vec::new(),
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub async fn view(&self) -> DashboardView {
        self.state.lock().await.view()
    }

    pub async fn toggle_comparison_area(&self, area: AreaKey) {
        self.state.lock().await.toggle_comparison_area(area);
    }

    /// Subscribes to the live feed, loads every fetched feed once and starts
    /// the re-selection ticker. A table load failure is recorded in the view
    /// and does not fail `start`.
    ///
    /// A stopped controller cannot be started again; build a new one.
    pub async fn start(&mut self) -> Result<()> {
        if self.cancel_token.is_cancelled() {
            bail!("dashboard was stopped");
        }
        if !self.tasks.is_empty() {
            bail!("dashboard already running");
        }

        if let Some(source) = self.snapshot_source.take() {
            let areas = self.state.lock().await.config().areas.clone();
            let subscription = SnapshotSubscription::subscribe(source, areas);
            self.tasks.push(tokio::spawn(forward_snapshots(
                subscription,
                Arc::clone(&self.state),
                self.cancel_token.clone(),
            )));
        }

        let status = self.load().await;
        log_info!("dashboard loaded: {:?}", status);

        self.tasks.push(tokio::spawn(refresh_loop(
            Arc::clone(&self.state),
            Arc::clone(&self.clock),
            self.refresh_interval,
            self.cancel_token.clone(),
        )));

        Ok(())
    }

    /// Fetches the table, comparison and weather feeds concurrently and
    /// applies whatever arrived.
    pub async fn load(&self) -> LoadStatus {
        let layout = self.state.lock().await.config().layout;

        let comparison = async {
            match &self.comparison_source {
                Some(source) => Some(load_comparison(source, &self.client).await),
                None => None,
            }
        };
        let weather = async {
            match &self.weather {
                Some(settings) => Some(fetch_current(&self.client, settings).await),
                None => None,
            }
        };

        let (table, comparison, weather) = tokio::join!(
            load_table(&self.table_source, layout, &self.client),
            comparison,
            weather
        );

        let now = (self.clock)();
        let mut state = self.state.lock().await;

        match comparison {
            Some(Ok(table)) => state.apply_comparison(table),
            Some(Err(err)) => log_warn!("comparison feed unavailable: {err}"),
            None => {}
        }
        match weather {
            Some(Ok(weather)) => state.apply_weather(weather),
            Some(Err(err)) => log_warn!("weather feed unavailable: {err}"),
            None => {}
        }

        state.apply_table(table, &now);
        state.status().clone()
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.cancel_token.cancel();
        for handle in self.tasks.drain(..) {
            handle.await.context("dashboard task failed to join")?;
        }
        Ok(())
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn forward_snapshots(
    mut subscription: SnapshotSubscription,
    state: Arc<Mutex<DashboardState>>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            next = subscription.changed() => match next {
                Ok(snapshot) => state.lock().await.apply_snapshot(snapshot),
                Err(err) => {
                    log_warn!("live snapshot feed ended: {err}");
                    break;
                }
            },
            _ = cancel_token.cancelled() => break,
        }
    }

    if let Err(err) = subscription.unsubscribe().await {
        log_error!("failed to release snapshot subscription: {err:?}");
    }
}

async fn refresh_loop(
    state: Arc<Mutex<DashboardState>>,
    clock: Clock,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = clock();
                let mut guard = state.lock().await;
                if guard.refresh(&now) {
                    if let Some(key) = guard.current_key() {
                        log_info!("current slot moved to {key}");
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("dashboard refresh loop shutting down");
                break;
            }
        }
    }
}
