//! Forecast retrieval from the Open-Meteo forecast API.

use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use tracing::{instrument, warn};

use crate::{
    error::WeatherError,
    http,
    model::{Location, RawForecastBundle},
};

pub const HOURLY_FIELDS: &[&str] = &[
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "pressure_msl",
    "precipitation",
    "windspeed_10m",
];

pub const DAILY_FIELDS: &[&str] = &["sunrise", "sunset", "temperature_2m_max", "temperature_2m_min"];

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<RawForecastBundle, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http::client(timeout)?,
        })
    }

    fn query(location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("timezone", "auto".to_string()),
            ("current_weather", "true".to_string()),
            ("hourly", HOURLY_FIELDS.join(",")),
            ("daily", DAILY_FIELDS.join(",")),
        ]
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    #[instrument(skip(self, location), fields(name = %location.name))]
    async fn fetch(&self, location: &Location) -> Result<RawForecastBundle, WeatherError> {
        let url = format!("{}/forecast", self.base_url);
        let bundle: RawForecastBundle =
            http::get_json(&self.http, &url, &Self::query(location), "forecast").await?;

        if !bundle.hourly.is_aligned() {
            warn!(
                hours = bundle.hourly.time.len(),
                "hourly series have mismatched lengths; missing values will be left empty"
            );
        }

        Ok(bundle)
    }
}
