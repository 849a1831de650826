//! Core library for the `weather` app.
//!
//! This crate defines:
//! - The location permission gate
//! - The weather fetch coordinator and its published `AppState`
//! - Presentation formatting (temperatures, icons)
//! - The OpenWeather provider, location sources and configuration
//!
//! It is used by `weather-cli`, but can also be driven by any other front end.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod format;
pub mod location;
pub mod model;
pub mod permission;
pub mod provider;

pub use config::Config;
pub use coordinator::{AppState, PendingFetch, WeatherCoordinator};
pub use error::{LocationError, WeatherError};
pub use format::{WeatherIcon, icon_for, kelvin_to_celsius_display};
pub use location::{FixStream, IpLocationTracker, LocationTracker, first_fix};
pub use model::{Location, WeatherQuery, WeatherReading};
pub use permission::{PermissionController, PermissionGate, PermissionState};
pub use provider::{WeatherProvider, provider_from_config};
