//! Place name and coordinate resolution via the Open-Meteo geocoding API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::{info, instrument};

use crate::{
    error::WeatherError,
    http,
    model::{Location, Query},
};

/// Name used when a reverse lookup finds no place.
pub const FALLBACK_PLACE: &str = "Your Location";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve a query to a single location; only the first candidate counts.
    async fn resolve(&self, query: &Query) -> Result<Location, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http::client(timeout)?,
        })
    }

    async fn search(&self, name: &str) -> Result<Location, WeatherError> {
        let url = format!("{}/search", self.base_url);
        let res: GeoResponse = http::get_json(
            &self.http,
            &url,
            &[
                ("name", name.trim().to_string()),
                ("count", "1".to_string()),
                ("language", "en".to_string()),
                ("format", "json".to_string()),
            ],
            "geocoding search",
        )
        .await?;

        let first = res
            .results
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| WeatherError::NotFound(name.trim().to_string()))?;

        Ok(Location {
            name: first.name,
            country: first.country.unwrap_or_default(),
            latitude: first.latitude,
            longitude: first.longitude,
        })
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Location, WeatherError> {
        let url = format!("{}/reverse", self.base_url);
        let res: GeoResponse = http::get_json(
            &self.http,
            &url,
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("count", "1".to_string()),
            ],
            "reverse geocoding",
        )
        .await?;

        let first = res.results.into_iter().flatten().next();

        Ok(Location {
            name: first
                .as_ref()
                .map(|r| r.name.clone())
                .unwrap_or_else(|| FALLBACK_PLACE.to_string()),
            country: first.and_then(|r| r.country).unwrap_or_default(),
            latitude,
            longitude,
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, query: &Query) -> Result<Location, WeatherError> {
        query.validate()?;

        let location = match query {
            Query::City(name) => self.search(name).await?,
            Query::Coordinates { latitude, longitude } => self.reverse(*latitude, *longitude).await?,
        };

        info!(name = %location.name, country = %location.country, "Resolved location");
        Ok(location)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}
