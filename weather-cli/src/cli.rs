use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use weather_core::{
    AppState, Config, IpLocationTracker, PendingFetch, PermissionGate, PermissionState,
    WeatherCoordinator, provider_from_config,
};

use crate::{consent::ConsentController, render::render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, optionally with country code, e.g. "Paris,FR".
        city: String,
    },

    /// Show weather for your location, or for explicit coordinates.
    Locate {
        /// Latitude in decimal degrees.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Inspect or reset the stored location consent.
    Permission {
        #[command(subcommand)]
        action: PermissionAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum PermissionAction {
    /// Print the stored consent.
    Status,
    /// Forget the stored consent so the next `locate` asks again.
    Reset,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let coordinator = coordinator()?;
                settle(&coordinator, coordinator.fetch_by_city_name(&city)).await
            }
            Command::Locate {
                lat: Some(lat),
                lon: Some(lon),
            } => {
                let coordinator = coordinator()?;
                settle(&coordinator, coordinator.fetch_by_coordinates(lat, lon)).await
            }
            Command::Locate { .. } => locate().await,
            Command::Permission { action } => {
                let gate = PermissionGate::new(Arc::new(ConsentController::load()?));
                let state = match action {
                    PermissionAction::Status => gate.check_permission().await,
                    PermissionAction::Reset => gate.open_settings().await,
                };
                println!("Location permission: {state}");
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());
    config.api_key()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn coordinator() -> anyhow::Result<WeatherCoordinator> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(WeatherCoordinator::new(provider))
}

async fn locate() -> anyhow::Result<()> {
    let coordinator = coordinator()?;
    let gate = PermissionGate::new(Arc::new(ConsentController::load()?));

    let mut state = gate.check_permission().await;
    if matches!(state, PermissionState::Undetermined | PermissionState::Denied) {
        state = gate.request_permission().await;
    }

    match state {
        PermissionState::Granted => {}
        PermissionState::DeniedPermanently => bail!(
            "Location permission permanently denied.\n\
             Hint: run `weather permission reset` to be asked again, or pass --lat/--lon."
        ),
        PermissionState::Undetermined | PermissionState::Denied => bail!(
            "Location permission denied.\n\
             Hint: pass --lat/--lon or use `weather show <city>`."
        ),
    }

    coordinator.set_loading();
    eprintln!("Locating...");
    let settled = coordinator
        .update_location_data(&IpLocationTracker::default())
        .await;
    report(settled)
}

async fn settle(coordinator: &WeatherCoordinator, pending: PendingFetch) -> anyhow::Result<()> {
    if coordinator.state().is_loading() {
        eprintln!("Loading...");
    }
    report(pending.await)
}

fn report(state: AppState) -> anyhow::Result<()> {
    match state {
        AppState::Success(reading) => {
            println!("{}", render(&reading));
            Ok(())
        }
        AppState::Error(message) => Err(anyhow!(message)),
        AppState::Loading => Err(anyhow!("Weather request did not settle")),
    }
}
