//! Core library for the `weathernow` CLI.
//!
//! This crate defines:
//! - Location resolution (forward and reverse geocoding)
//! - Forecast retrieval and normalization into a single snapshot
//! - Weather-code table and display unit conversion
//! - The recency list and the last-request-wins dashboard
//! - Local accounts and session tokens
//! - Configuration
//!
//! It is used by `weathernow-cli`, but can also be reused by other binaries or services.

pub mod auth;
pub mod codes;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod geocode;
mod http;
pub mod model;
pub mod normalize;
pub mod recent;
pub mod units;

pub use auth::{AuthService, FileAccountStore, MemoryAccountStore};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{AuthError, WeatherError};
pub use forecast::{ForecastSource, OpenMeteoForecast};
pub use geocode::{Geocoder, OpenMeteoGeocoder};
pub use model::{Location, Query, RawForecastBundle, WeatherSnapshot};
pub use normalize::normalize;
pub use recent::RecentLocations;
pub use units::{TemperatureUnit, to_fahrenheit};
