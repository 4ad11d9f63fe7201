//! Polling sources publishing the latest station data.
//!
//! Each source is an explicit spawned task owning its timer. Dropping the
//! handle aborts the task, so nothing is published after deactivation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::client::StationApi;
use crate::models::{BikeStation, Position};
use crate::settings::Settings;

use super::{board_stations, nearest_bike_station_ids};

/// Fixed interval between automatic re-fetches, shared by all polling
/// consumers.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to the running station poller.
///
/// The latest value is `None` until the first successful fetch. Dropping the
/// handle cancels the task deterministically.
pub struct StationSource {
    rx: watch::Receiver<Option<Vec<BikeStation>>>,
    task: JoinHandle<()>,
}

impl StationSource {
    /// Spawn the poller with the process-wide refresh interval.
    pub fn spawn(
        api: Arc<dyn StationApi>,
        settings: watch::Receiver<Settings>,
        nearest: watch::Receiver<Vec<String>>,
    ) -> Self {
        Self::spawn_with_interval(api, settings, nearest, REFRESH_INTERVAL)
    }

    /// Spawn the poller with an explicit interval.
    pub fn spawn_with_interval(
        api: Arc<dyn StationApi>,
        settings: watch::Receiver<Settings>,
        nearest: watch::Receiver<Vec<String>>,
        interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(run_stations(api, settings, nearest, interval, tx));
        Self { rx, task }
    }

    /// Receiver for the latest published list.
    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<BikeStation>>> {
        self.rx.clone()
    }

    /// Latest published value, if any.
    pub fn latest(&self) -> Option<Vec<BikeStation>> {
        self.rx.borrow().clone()
    }
}

impl Drop for StationSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_stations(
    api: Arc<dyn StationApi>,
    mut settings: watch::Receiver<Settings>,
    mut nearest: watch::Receiver<Vec<String>>,
    interval: Duration,
    tx: watch::Sender<Option<Vec<BikeStation>>>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so the select below
    // waits a full interval after the initial fetch.
    ticker.tick().await;

    loop {
        let snapshot = settings.borrow_and_update().clone();
        let ids = nearest.borrow_and_update().clone();
        match board_stations(api.as_ref(), &snapshot, &ids).await {
            Ok(stations) => {
                if tx.send(Some(stations)).is_err() {
                    break;
                }
            }
            // Swallowed on purpose; the next tick tries again and the
            // previously published value stands.
            Err(err) => warn!("station fetch failed: {err}"),
        }

        tokio::select! {
            _ = ticker.tick() => {}
            changed = settings.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = nearest.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tx.closed() => break,
        }
    }
}

/// Handle to the nearby-places poller.
///
/// Publishes the ids of nearby bike-rental stations, and only when the id
/// list actually changed, so an unchanged neighbourhood does not wake the
/// station poller.
pub struct NearestSource {
    rx: watch::Receiver<Vec<String>>,
    task: JoinHandle<()>,
}

impl NearestSource {
    /// Spawn the poller with the process-wide refresh interval.
    pub fn spawn(
        api: Arc<dyn StationApi>,
        position: Position,
        settings: watch::Receiver<Settings>,
    ) -> Self {
        Self::spawn_with_interval(api, position, settings, REFRESH_INTERVAL)
    }

    /// Spawn the poller with an explicit interval.
    pub fn spawn_with_interval(
        api: Arc<dyn StationApi>,
        position: Position,
        settings: watch::Receiver<Settings>,
        interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        let task = tokio::spawn(run_nearest(api, position, settings, interval, tx));
        Self { rx, task }
    }

    /// Receiver for the memoized nearby station ids.
    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.rx.clone()
    }
}

impl Drop for NearestSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_nearest(
    api: Arc<dyn StationApi>,
    position: Position,
    mut settings: watch::Receiver<Settings>,
    interval: Duration,
    tx: watch::Sender<Vec<String>>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        let distance = settings.borrow_and_update().distance;
        match api.nearest_places(position, distance).await {
            Ok(places) => {
                let ids = nearest_bike_station_ids(&places);
                tx.send_if_modified(|current| {
                    if *current == ids {
                        false
                    } else {
                        *current = ids;
                        true
                    }
                });
            }
            Err(err) => debug!("nearest-places fetch failed: {err}"),
        }

        tokio::select! {
            _ = ticker.tick() => {}
            changed = settings.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tx.closed() => break,
        }
    }
}
