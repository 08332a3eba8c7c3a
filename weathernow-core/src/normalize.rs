//! Merge the current/hourly/daily forecast blocks into one [`WeatherSnapshot`].
//!
//! Each numeric field is derived from an ordered chain of accessors; the first
//! one that yields a value wins. Missing values stay `None` rather than
//! failing the whole snapshot.

use tracing::debug;

use crate::{
    codes,
    model::{Location, RawForecastBundle, WeatherSnapshot},
};

/// Reads one candidate value from the bundle at the aligned hourly index.
pub type Accessor = fn(&RawForecastBundle, usize) -> Option<f64>;

const TEMPERATURE: &[Accessor] = &[current_temperature, hourly_temperature];
const FEELS_LIKE: &[Accessor] = &[hourly_apparent_temperature, current_temperature];
const WINDSPEED: &[Accessor] = &[current_windspeed, hourly_windspeed];
const HUMIDITY: &[Accessor] = &[hourly_humidity];
const PRECIPITATION: &[Accessor] = &[hourly_precipitation];
const PRESSURE: &[Accessor] = &[hourly_pressure];

/// Build the display snapshot for `location` from a raw provider bundle.
pub fn normalize(location: &Location, bundle: &RawForecastBundle) -> WeatherSnapshot {
    let idx = align(bundle);
    let code = codes::lookup(bundle.current.weathercode);

    WeatherSnapshot {
        location: location.clone(),
        temperature: first_defined(TEMPERATURE, bundle, idx),
        feels_like: first_defined(FEELS_LIKE, bundle, idx),
        windspeed: first_defined(WINDSPEED, bundle, idx),
        humidity: first_defined(HUMIDITY, bundle, idx),
        precipitation: first_defined(PRECIPITATION, bundle, idx),
        pressure: first_defined(PRESSURE, bundle, idx),
        sunrise: first_text(&bundle.daily.sunrise).and_then(time_of_day),
        sunset: first_text(&bundle.daily.sunset).and_then(time_of_day),
        temperature_max: at(&bundle.daily.temperature_2m_max, 0),
        temperature_min: at(&bundle.daily.temperature_2m_min, 0),
        description: code.description.to_string(),
        icon: code.icon.to_string(),
        observed_at: bundle.current.time.clone(),
    }
}

/// Index of the current observation within the hourly series.
///
/// Falls back to 0 when `current.time` is outside the hourly window; the
/// hourly values then describe the first hour, not the observation time.
pub fn align(bundle: &RawForecastBundle) -> usize {
    match bundle.hourly.time.iter().position(|t| *t == bundle.current.time) {
        Some(idx) => idx,
        None => {
            debug!(
                current = %bundle.current.time,
                hours = bundle.hourly.time.len(),
                "current time not in hourly series, using index 0"
            );
            0
        }
    }
}

/// Evaluate a fallback chain in order.
pub fn first_defined(chain: &[Accessor], bundle: &RawForecastBundle, idx: usize) -> Option<f64> {
    chain.iter().find_map(|accessor| accessor(bundle, idx))
}

fn at(series: &[Option<f64>], idx: usize) -> Option<f64> {
    series.get(idx).copied().flatten()
}

fn first_text(series: &[Option<String>]) -> Option<&str> {
    series.first().and_then(|s| s.as_deref())
}

/// "2024-01-01T07:45" -> "07:45".
fn time_of_day(timestamp: &str) -> Option<String> {
    timestamp.split_once('T').map(|(_, time)| time.to_string())
}

fn current_temperature(b: &RawForecastBundle, _: usize) -> Option<f64> {
    b.current.temperature
}

fn current_windspeed(b: &RawForecastBundle, _: usize) -> Option<f64> {
    b.current.windspeed
}

fn hourly_temperature(b: &RawForecastBundle, idx: usize) -> Option<f64> {
    at(&b.hourly.temperature_2m, idx)
}

fn hourly_apparent_temperature(b: &RawForecastBundle, idx: usize) -> Option<f64> {
    at(&b.hourly.apparent_temperature, idx)
}

fn hourly_windspeed(b: &RawForecastBundle, idx: usize) -> Option<f64> {
    at(&b.hourly.windspeed_10m, idx)
}

fn hourly_humidity(b: &RawForecastBundle, idx: usize) -> Option<f64> {
    at(&b.hourly.relative_humidity_2m, idx)
}

fn hourly_precipitation(b: &RawForecastBundle, idx: usize) -> Option<f64> {
    at(&b.hourly.precipitation, idx)
}

fn hourly_pressure(b: &RawForecastBundle, idx: usize) -> Option<f64> {
    at(&b.hourly.pressure_msl, idx)
}
