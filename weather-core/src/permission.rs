//! Location permission gate.
//!
//! The gate is the only writer of the published [`PermissionState`]. It asks a
//! platform [`PermissionController`] for the current state or for a grant and
//! republishes the outcome. Controller failures other than a denial are logged
//! and leave the published state untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::WeatherError;

/// Lifecycle of the location permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Undetermined,
    Granted,
    Denied,
    DeniedPermanently,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Undetermined => "undetermined",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::DeniedPermanently => "denied permanently",
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform side of the permission flow.
///
/// `provide` resolves `Ok(())` on grant and reports a refusal as
/// [`WeatherError::PermissionDenied`] or
/// [`WeatherError::PermissionDeniedPermanently`]. Any other error is treated
/// as unexpected.
#[async_trait]
pub trait PermissionController: Send + Sync + Debug {
    async fn state(&self) -> Result<PermissionState, WeatherError>;

    async fn is_granted(&self) -> Result<bool, WeatherError> {
        Ok(self.state().await?.is_granted())
    }

    async fn provide(&self) -> Result<(), WeatherError>;

    async fn open_app_settings(&self) -> Result<(), WeatherError>;
}

#[derive(Debug)]
pub struct PermissionGate {
    controller: Arc<dyn PermissionController>,
    state: watch::Sender<PermissionState>,
}

impl PermissionGate {
    /// Starts `Undetermined`; call [`PermissionGate::check_permission`] to sync
    /// with the platform.
    pub fn new(controller: Arc<dyn PermissionController>) -> Self {
        let (state, _) = watch::channel(PermissionState::Undetermined);
        Self { controller, state }
    }

    pub fn state(&self) -> PermissionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PermissionState> {
        self.state.subscribe()
    }

    pub async fn check_permission(&self) -> PermissionState {
        match self.controller.state().await {
            Ok(current) => {
                debug!(state = %current, "permission state checked");
                self.publish(current)
            }
            Err(err) => {
                error!(error = %err, "failed to query location permission");
                self.state()
            }
        }
    }

    /// Ask for the permission unless it is already granted.
    ///
    /// A permanent denial is never re-prompted; only the platform state is
    /// re-read in case it was changed from the settings screen.
    pub async fn request_permission(&self) -> PermissionState {
        if self.state() == PermissionState::DeniedPermanently {
            let current = self.check_permission().await;
            if current == PermissionState::DeniedPermanently {
                debug!("permission permanently denied; not prompting");
                return current;
            }
        }

        match self.controller.is_granted().await {
            Ok(true) => return self.publish(PermissionState::Granted),
            Ok(false) => {}
            Err(err) => {
                error!(error = %err, "failed to query location permission");
                return self.state();
            }
        }

        match self.controller.provide().await {
            Ok(()) => {
                info!("location permission granted");
                self.publish(PermissionState::Granted)
            }
            Err(WeatherError::PermissionDenied) => {
                info!("location permission denied");
                self.publish(PermissionState::Denied)
            }
            Err(WeatherError::PermissionDeniedPermanently) => {
                info!("location permission permanently denied");
                self.publish(PermissionState::DeniedPermanently)
            }
            Err(err) => {
                error!(error = %err, "location permission request failed");
                self.state()
            }
        }
    }

    /// Hand over to the platform settings, then pick up whatever changed there.
    pub async fn open_settings(&self) -> PermissionState {
        if let Err(err) = self.controller.open_app_settings().await {
            error!(error = %err, "failed to open app settings");
            return self.state();
        }

        self.check_permission().await
    }

    fn publish(&self, next: PermissionState) -> PermissionState {
        self.state.send_replace(next);
        next
    }
}
