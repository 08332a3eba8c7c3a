use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Display unit for temperatures. Snapshots always hold Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }

    /// Convert a stored Celsius value for display, rounded to one decimal.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => round1(celsius),
            TemperatureUnit::Fahrenheit => to_fahrenheit(celsius),
        }
    }

    /// Render a temperature, or a dash when the value is missing.
    pub fn format(&self, celsius: Option<f64>) -> String {
        match celsius {
            Some(c) => format!("{}{}", self.convert(c), self.symbol()),
            None => "—".to_string(),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius (c), fahrenheit (f)."
            )),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemperatureUnit::try_from(s)
    }
}

/// F = C × 9/5 + 32, rounded to one decimal place.
pub fn to_fahrenheit(celsius: f64) -> f64 {
    round1(celsius * 9.0 / 5.0 + 32.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn freezing_and_boiling_points() {
        assert!(close(to_fahrenheit(0.0), 32.0));
        assert!(close(to_fahrenheit(100.0), 212.0));
    }

    #[test]
    fn fahrenheit_rounds_to_one_decimal() {
        assert!(close(to_fahrenheit(37.0), 98.6));
        assert!(close(to_fahrenheit(21.3), 70.3));
        assert!(close(to_fahrenheit(-40.0), -40.0));
    }

    #[test]
    fn format_renders_placeholder_for_gaps() {
        assert_eq!(TemperatureUnit::Celsius.format(None), "—");
        assert_eq!(TemperatureUnit::Celsius.format(Some(12.34)), "12.3°C");
        assert_eq!(TemperatureUnit::Fahrenheit.format(Some(0.0)), "32°F");
    }

    #[test]
    fn convert_does_not_touch_the_source_value() {
        let stored = 20.0;
        let shown = TemperatureUnit::Fahrenheit.convert(stored);
        assert!(close(shown, 68.0));
        assert!(close(stored, 20.0));
    }

    #[test]
    fn unit_parsing_roundtrip() {
        for unit in TemperatureUnit::all() {
            let parsed = TemperatureUnit::try_from(unit.as_str()).expect("roundtrip should succeed");
            assert_eq!(*unit, parsed);
        }
        assert_eq!("F".parse::<TemperatureUnit>().ok(), Some(TemperatureUnit::Fahrenheit));
    }

    #[test]
    fn unknown_unit_error() {
        let err = TemperatureUnit::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit"));
    }
}
