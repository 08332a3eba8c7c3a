use chrono::NaiveDateTime;
use weathernow_core::{TemperatureUnit, WeatherSnapshot};

/// Multi-line, emoji-decorated summary of a snapshot.
pub fn snapshot(snap: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    let place = if snap.location.country.is_empty() {
        snap.location.name.clone()
    } else {
        format!("{}, {}", snap.location.name, snap.location.country)
    };

    let lines = [
        format!("{} {place}", snap.icon),
        snap.description.clone(),
        format!(
            "🌡 {} (Feels like {})",
            unit.format(snap.temperature),
            unit.format(snap.feels_like)
        ),
        format!(
            "⬆ {}  ⬇ {}",
            unit.format(snap.temperature_max),
            unit.format(snap.temperature_min)
        ),
        format!("💨 {} km/h", value(snap.windspeed)),
        format!("💧 {}% humidity", value(snap.humidity)),
        format!("🌧 {} mm rain", value(snap.precipitation)),
        format!("📈 {} hPa", value(snap.pressure)),
        format!("🌅 {} | 🌇 {}", text(&snap.sunrise), text(&snap.sunset)),
        format!("Last updated: {}", observed_time(&snap.observed_at)),
    ];

    lines.join("\n")
}

/// "Recent: Oslo, Berlin, Paris", or `None` when the list is empty.
pub fn recent(names: &[String]) -> Option<String> {
    if names.is_empty() {
        None
    } else {
        Some(format!("Recent: {}", names.join(", ")))
    }
}

fn value(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}

fn text(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("—")
}

/// Time-of-day of the provider's local timestamp; unparseable values pass through.
fn observed_time(observed_at: &str) -> String {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(observed_at, fmt).ok())
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| observed_at.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathernow_core::Location;

    fn sample() -> WeatherSnapshot {
        WeatherSnapshot {
            location: Location {
                name: "Oslo".into(),
                country: "Norway".into(),
                latitude: 59.91,
                longitude: 10.75,
            },
            temperature: Some(-3.0),
            feels_like: Some(-7.4),
            windspeed: Some(14.2),
            humidity: Some(88.0),
            precipitation: None,
            pressure: Some(1020.3),
            sunrise: Some("09:12".into()),
            sunset: None,
            temperature_max: Some(-1.0),
            temperature_min: Some(-6.0),
            description: "Snow".into(),
            icon: "❄️".into(),
            observed_at: "2024-01-15T12:15".into(),
        }
    }

    #[test]
    fn renders_celsius_with_placeholders() {
        let out = snapshot(&sample(), TemperatureUnit::Celsius);

        assert!(out.starts_with("❄️ Oslo, Norway\nSnow\n"));
        assert!(out.contains("🌡 -3°C (Feels like -7.4°C)"));
        assert!(out.contains("🌧 — mm rain"));
        assert!(out.contains("🌅 09:12 | 🌇 —"));
        assert!(out.contains("Last updated: 12:15:00"));
    }

    #[test]
    fn renders_fahrenheit_without_changing_snapshot() {
        let snap = sample();
        let out = snapshot(&snap, TemperatureUnit::Fahrenheit);

        assert!(out.contains("🌡 26.6°F (Feels like 18.7°F)"));
        assert_eq!(snap.temperature, Some(-3.0));
    }

    #[test]
    fn reverse_geocoded_place_without_country() {
        let mut snap = sample();
        snap.location.name = "Your Location".into();
        snap.location.country.clear();

        assert!(snapshot(&snap, TemperatureUnit::Celsius).starts_with("❄️ Your Location\n"));
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        assert_eq!(observed_time("soon"), "soon");
    }

    #[test]
    fn recent_line() {
        assert_eq!(recent(&[]), None);
        assert_eq!(
            recent(&["Oslo".to_string(), "Paris".to_string()]).as_deref(),
            Some("Recent: Oslo, Paris")
        );
    }
}
