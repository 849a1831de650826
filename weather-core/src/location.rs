//! Location sources.
//!
//! A [`LocationTracker`] reports a continuous stream of fixes once tracking is
//! started. The weather flow only ever needs one, so [`first_fix`] starts
//! tracking, waits for the first fix and stops tracking again. A source that
//! gives up sends its error down the stream before closing it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Mutex, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Location, LocationError};

/// Receiving end of a tracker's fixes.
pub type FixStream = mpsc::Receiver<Result<Location, LocationError>>;

#[async_trait]
pub trait LocationTracker: Send + Sync + Debug {
    /// Start tracking and return the receiving end of the fix stream.
    async fn start_tracking(&self) -> Result<FixStream, LocationError>;

    fn stop_tracking(&self);
}

/// Subscribe, await the first fix, unsubscribe.
pub async fn first_fix(tracker: &dyn LocationTracker) -> Result<Location, LocationError> {
    let mut fixes = tracker.start_tracking().await?;
    let fix = fixes.recv().await;
    tracker.stop_tracking();
    drop(fixes);

    fix.unwrap_or(Err(LocationError::StreamClosed))
}

pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Approximate location from IP geolocation, re-polled on an interval while
/// tracking.
#[derive(Debug)]
pub struct IpLocationTracker {
    http: Client,
    lookup_url: String,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Default for IpLocationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOOKUP_URL)
    }
}

impl IpLocationTracker {
    pub fn new(lookup_url: &str) -> Self {
        Self {
            http: Client::new(),
            lookup_url: lookup_url.to_string(),
            interval: DEFAULT_POLL_INTERVAL,
            task: Mutex::new(None),
        }
    }

    fn replace_task(&self, next: Option<JoinHandle<()>>) {
        let mut slot = match self.task.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = std::mem::replace(&mut *slot, next) {
            previous.abort();
        }
    }
}

impl Drop for IpLocationTracker {
    fn drop(&mut self) {
        self.replace_task(None);
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

async fn lookup(http: &Client, url: &str) -> Result<Location, LocationError> {
    let res: IpApiResponse = http.get(url).send().await?.error_for_status()?.json().await?;

    if res.status != "success" {
        return Err(LocationError::Unavailable(
            res.message.unwrap_or_else(|| format!("lookup status '{}'", res.status)),
        ));
    }

    match (res.lat, res.lon) {
        (Some(latitude), Some(longitude)) => Ok(Location {
            latitude,
            longitude,
            city: res.city,
        }),
        _ => Err(LocationError::Unavailable(
            "lookup response did not include coordinates".to_string(),
        )),
    }
}

#[async_trait]
impl LocationTracker for IpLocationTracker {
    async fn start_tracking(&self) -> Result<FixStream, LocationError> {
        let (tx, rx) = mpsc::channel(1);
        let http = self.http.clone();
        let url = self.lookup_url.clone();
        let interval = self.interval;

        let span = info_span!("location.track", service = "ip-api");
        let task = tokio::spawn(
            async move {
                let mut ticker = tokio::time::interval(interval);
                loop {
                    ticker.tick().await;
                    match lookup(&http, &url).await {
                        Ok(fix) => {
                            info!(lat = fix.latitude, lon = fix.longitude, "location fix");
                            if tx.send(Ok(fix)).await.is_err() {
                                debug!("fix receiver dropped; stopping");
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, "location lookup failed");
                            let _ = tx.send(Err(err)).await;
                            break;
                        }
                    }
                }
            }
            .instrument(span),
        );

        self.replace_task(Some(task));
        Ok(rx)
    }

    fn stop_tracking(&self) {
        self.replace_task(None);
    }
}
