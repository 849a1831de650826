//! Weather fetch coordinator.
//!
//! Publishes an [`AppState`] that moves to `Loading` the moment a fetch is
//! started and to `Success` or `Error` when it settles. Fetches are not
//! coordinated with each other: the last one to settle wins.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Weak},
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    WeatherError, WeatherQuery, WeatherReading,
    location::{LocationTracker, first_fix},
    provider::WeatherProvider,
};

/// Outcome of the weather workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Loading,
    Success(WeatherReading),
    Error(String),
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AppState::Loading)
    }
}

impl From<Result<WeatherReading, WeatherError>> for AppState {
    fn from(result: Result<WeatherReading, WeatherError>) -> Self {
        match result {
            Ok(reading) => AppState::Success(reading),
            Err(err) => AppState::Error(err.to_string()),
        }
    }
}

/// A fetch that has already published `Loading` and settles when awaited.
pub type PendingFetch = Pin<Box<dyn Future<Output = AppState> + Send + 'static>>;

#[derive(Debug)]
pub struct WeatherCoordinator {
    provider: Arc<dyn WeatherProvider>,
    state: Arc<watch::Sender<AppState>>,
}

impl WeatherCoordinator {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(AppState::Loading);
        Self {
            provider,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn set_loading(&self) -> AppState {
        self.state.send_replace(AppState::Loading);
        AppState::Loading
    }

    pub fn fetch_by_coordinates(&self, lat: f64, lon: f64) -> PendingFetch {
        self.fetch(WeatherQuery::Coordinates { lat, lon })
    }

    pub fn fetch_by_city_name(&self, name: &str) -> PendingFetch {
        self.fetch(WeatherQuery::City(name.to_string()))
    }

    /// Take the first fix from `tracker` and fetch the weather there.
    ///
    /// When the provider has no place name for the coordinates, the city the
    /// location source reported is used instead.
    pub async fn update_location_data(&self, tracker: &dyn LocationTracker) -> AppState {
        match first_fix(tracker).await {
            Ok(fix) => {
                let query = WeatherQuery::Coordinates {
                    lat: fix.latitude,
                    lon: fix.longitude,
                };
                self.fetch_labelled(query, fix.city).await
            }
            Err(err) => {
                warn!(error = %err, "no location fix");
                let failed = AppState::Error(WeatherError::from(err).to_string());
                self.state.send_replace(failed.clone());
                failed
            }
        }
    }

    /// Publishes `Loading` before returning. The returned future holds only
    /// a weak handle on the published state, so a result arriving after the
    /// coordinator is dropped goes nowhere.
    pub fn fetch(&self, query: WeatherQuery) -> PendingFetch {
        self.fetch_labelled(query, None)
    }

    fn fetch_labelled(&self, query: WeatherQuery, fallback_name: Option<String>) -> PendingFetch {
        self.set_loading();

        let provider = Arc::clone(&self.provider);
        let state: Weak<watch::Sender<AppState>> = Arc::downgrade(&self.state);

        Box::pin(async move {
            debug!(%query, "fetch started");
            let result = provider.current_weather(&query).await.map(|mut reading| {
                if reading.name.as_deref().is_none_or(str::is_empty) {
                    reading.name = fallback_name.or(reading.name);
                }
                reading
            });
            let settled = AppState::from(result);

            if let AppState::Error(message) = &settled {
                warn!(%query, %message, "fetch failed");
            }

            match state.upgrade() {
                Some(state) => {
                    state.send_replace(settled.clone());
                }
                None => debug!(%query, "coordinator gone; discarding result"),
            }

            settled
        })
    }
}
