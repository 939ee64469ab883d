//! Live occupancy snapshot subscription.
//!
//! A subscription owns one background task that turns pushed JSON records
//! into [`RealtimeSnapshot`]s and publishes the latest one on a watch
//! channel. Cancelling (or dropping) the subscription stops the task.

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::FeedError;
use crate::models::{AreaKey, RealtimeSnapshot};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const POLL_TIMEOUT_SECS: u64 = 10;

/// Builds the REST location of a realtime database node, e.g.
/// `https://db.example/current-occupancy.json`.
pub fn rest_url(database_url: &str, path: &str) -> String {
    let base = database_url.trim_end_matches('/');
    let path = path.trim_matches('/');
    format!("{base}/{path}.json")
}

pub enum SnapshotSource {
    /// Polls a REST endpoint returning the snapshot record as JSON.
    /// The token is sent as the `auth` query parameter on each request.
    RestPoll {
        url: String,
        auth_token: Option<String>,
        interval: Duration,
        client: reqwest::Client,
    },
    /// Records pushed in-process by whoever owns the sender.
    Channel(mpsc::Receiver<Value>),
}

pub struct SnapshotSubscription {
    receiver: watch::Receiver<Option<RealtimeSnapshot>>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotSubscription {
    /// Starts delivering snapshots for `areas`. Must be called inside a tokio
    /// runtime.
    pub fn subscribe(source: SnapshotSource, areas: Vec<AreaKey>) -> Self {
        let (sender, receiver) = watch::channel(None);
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = match source {
            SnapshotSource::RestPoll {
                url,
                auth_token,
                interval,
                client,
            } => tokio::spawn(poll_loop(
                PollTarget { url, auth_token },
                interval,
                client,
                areas,
                sender,
                token_clone,
            )),
            SnapshotSource::Channel(records) => {
                tokio::spawn(channel_loop(records, areas, sender, token_clone))
            }
        };

        Self {
            receiver,
            cancel_token,
            handle: Some(handle),
        }
    }

    pub fn latest(&self) -> Option<RealtimeSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot.
    pub async fn changed(&mut self) -> Result<RealtimeSnapshot, FeedError> {
        loop {
            self.receiver.changed().await.map_err(|_| FeedError::Closed)?;
            if let Some(snapshot) = self.receiver.borrow_and_update().clone() {
                return Ok(snapshot);
            }
        }
    }

    /// Stops the feed task and waits for it to finish.
    pub async fn unsubscribe(mut self) -> Result<()> {
        self.cancel_token.cancel();
        match self.handle.take() {
            Some(handle) => handle.await.context("snapshot feed task failed to join"),
            None => Ok(()),
        }
    }
}

impl Drop for SnapshotSubscription {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

fn publish(
    record: &Value,
    areas: &[AreaKey],
    sender: &watch::Sender<Option<RealtimeSnapshot>>,
) {
    match RealtimeSnapshot::from_json(record, areas, Utc::now()) {
        Some(snapshot) => {
            let _ = sender.send(Some(snapshot));
        }
        None => log_warn!("ignoring empty snapshot record"),
    }
}

struct PollTarget {
    url: String,
    auth_token: Option<String>,
}

async fn poll_loop(
    target: PollTarget,
    interval: Duration,
    client: reqwest::Client,
    areas: Vec<AreaKey>,
    sender: watch::Sender<Option<RealtimeSnapshot>>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = fetch_record(&client, &target.url, target.auth_token.as_deref());
                match tokio::time::timeout(Duration::from_secs(POLL_TIMEOUT_SECS), fut).await {
                    Ok(Ok(record)) => publish(&record, &areas, &sender),
                    Ok(Err(err)) => log_warn!("snapshot poll failed: {err}"),
                    Err(_) => log_warn!("snapshot poll timeout (> {}s)", POLL_TIMEOUT_SECS),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("snapshot poll loop shutting down");
                break;
            }
        }
    }
}

async fn fetch_record(
    client: &reqwest::Client,
    url: &str,
    auth_token: Option<&str>,
) -> Result<Value, FeedError> {
    let mut request = client.get(url);
    if let Some(token) = auth_token {
        request = request.query(&[("auth", token)]);
    }

    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FeedError::status(url, status.as_u16()));
    }
    resp.json::<Value>().await.map_err(FeedError::decode)
}

async fn channel_loop(
    mut records: mpsc::Receiver<Value>,
    areas: Vec<AreaKey>,
    sender: watch::Sender<Option<RealtimeSnapshot>>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            record = records.recv() => match record {
                Some(record) => publish(&record, &areas, &sender),
                None => {
                    log_info!("snapshot channel closed");
                    break;
                }
            },
            _ = cancel_token.cancelled() => {
                log_info!("snapshot channel loop shutting down");
                break;
            }
        }
    }
}
