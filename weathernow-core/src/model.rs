use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A resolved place, as returned by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// What the user asked for: a place name or device coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl Query {
    /// Reject queries that can never resolve, before any network call.
    pub fn validate(&self) -> Result<(), WeatherError> {
        match self {
            Query::City(name) if name.trim().is_empty() => Err(WeatherError::EmptyQuery),
            Query::City(_) => Ok(()),
            Query::Coordinates { latitude, longitude } => {
                if !(-90.0..=90.0).contains(latitude) || !(-180.0..=180.0).contains(longitude) {
                    return Err(WeatherError::InvalidCoordinates);
                }
                Ok(())
            }
        }
    }
}

/// `current_weather` block of the forecast response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub time: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub weathercode: Option<i32>,
}

/// `hourly` block: parallel arrays indexed like `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub apparent_temperature: Vec<Option<f64>>,
    pub relative_humidity_2m: Vec<Option<f64>>,
    pub pressure_msl: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub windspeed_10m: Vec<Option<f64>>,
}

impl HourlySeries {
    /// Every value array has the same length as `time`.
    pub fn is_aligned(&self) -> bool {
        let n = self.time.len();
        [
            &self.temperature_2m,
            &self.apparent_temperature,
            &self.relative_humidity_2m,
            &self.pressure_msl,
            &self.precipitation,
            &self.windspeed_10m,
        ]
        .iter()
        .all(|series| series.len() == n)
    }
}

/// `daily` block: one entry per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
}

/// Forecast payload exactly as the provider returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastBundle {
    #[serde(rename = "current_weather")]
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

/// Normalized, display-ready weather for one location.
///
/// Temperatures are always Celsius; convert at display time with
/// [`crate::units::TemperatureUnit`]. A `None` field is a gap in the
/// provider data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub windspeed: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
    pub pressure: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub description: String,
    pub icon: String,
    pub observed_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_city_is_rejected() {
        assert!(matches!(
            Query::City("   ".into()).validate(),
            Err(WeatherError::EmptyQuery)
        ));
        assert!(Query::City("Paris".into()).validate().is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let q = Query::Coordinates { latitude: 91.0, longitude: 0.0 };
        assert!(matches!(q.validate(), Err(WeatherError::InvalidCoordinates)));

        let q = Query::Coordinates { latitude: -33.86, longitude: 151.2 };
        assert!(q.validate().is_ok());
    }

    #[test]
    fn bundle_parses_nulls_and_detects_misalignment() {
        let json = r#"{
            "current_weather": {"time": "2024-01-01T00:00", "temperature": 1.5, "windspeed": 4.0, "weathercode": 3},
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                "temperature_2m": [1.5, null],
                "apparent_temperature": [0.2, 0.1],
                "relative_humidity_2m": [80, 82],
                "pressure_msl": [1012.0, 1011.5],
                "precipitation": [0.0, 0.1],
                "windspeed_10m": [4.0]
            },
            "daily": {
                "time": ["2024-01-01"],
                "sunrise": ["2024-01-01T08:10"],
                "sunset": ["2024-01-01T16:20"],
                "temperature_2m_max": [3.0],
                "temperature_2m_min": [-1.0]
            }
        }"#;

        let bundle: RawForecastBundle = serde_json::from_str(json).expect("valid bundle");
        assert_eq!(bundle.current.weathercode, Some(3));
        assert_eq!(bundle.hourly.temperature_2m, vec![Some(1.5), None]);
        assert!(!bundle.hourly.is_aligned());
    }

    #[test]
    fn bundle_without_hourly_block_fails() {
        let json = r#"{"current_weather": {"time": "2024-01-01T00:00"}, "daily": {}}"#;
        assert!(serde_json::from_str::<RawForecastBundle>(json).is_err());
    }
}
