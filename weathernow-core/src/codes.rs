//! WMO weather interpretation codes.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Description and icon for one weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub description: &'static str,
    pub icon: &'static str,
}

/// Returned for codes the table does not know.
pub const UNKNOWN: CodeEntry = CodeEntry { description: "Unknown", icon: "❔" };

const TABLE: &[(i32, CodeEntry)] = &[
    (0, CodeEntry { description: "Clear Sky", icon: "☀️" }),
    (1, CodeEntry { description: "Mainly Clear", icon: "🌤️" }),
    (2, CodeEntry { description: "Partly Cloudy", icon: "⛅" }),
    (3, CodeEntry { description: "Overcast", icon: "☁️" }),
    (45, CodeEntry { description: "Fog", icon: "🌫️" }),
    (48, CodeEntry { description: "Depositing Rime Fog", icon: "🌫️" }),
    (51, CodeEntry { description: "Light Drizzle", icon: "🌦️" }),
    (53, CodeEntry { description: "Drizzle", icon: "🌦️" }),
    (55, CodeEntry { description: "Dense Drizzle", icon: "🌦️" }),
    (56, CodeEntry { description: "Freezing Drizzle", icon: "🌨️" }),
    (57, CodeEntry { description: "Dense Freezing Drizzle", icon: "🌨️" }),
    (61, CodeEntry { description: "Rain", icon: "🌧️" }),
    (63, CodeEntry { description: "Moderate Rain", icon: "🌧️" }),
    (65, CodeEntry { description: "Heavy Rain", icon: "🌧️" }),
    (66, CodeEntry { description: "Freezing Rain", icon: "🌨️" }),
    (67, CodeEntry { description: "Heavy Freezing Rain", icon: "🌨️" }),
    (71, CodeEntry { description: "Snow", icon: "❄️" }),
    (73, CodeEntry { description: "Moderate Snow", icon: "❄️" }),
    (75, CodeEntry { description: "Heavy Snow", icon: "❄️" }),
    (77, CodeEntry { description: "Snow Grains", icon: "❄️" }),
    (80, CodeEntry { description: "Rain Showers", icon: "🌦️" }),
    (81, CodeEntry { description: "Moderate Rain Showers", icon: "🌦️" }),
    (82, CodeEntry { description: "Violent Rain Showers", icon: "⛈️" }),
    (85, CodeEntry { description: "Snow Showers", icon: "🌨️" }),
    (86, CodeEntry { description: "Heavy Snow Showers", icon: "🌨️" }),
    (95, CodeEntry { description: "Thunderstorm", icon: "⛈️" }),
    (96, CodeEntry { description: "Thunderstorm with Hail", icon: "⛈️" }),
    (99, CodeEntry { description: "Thunderstorm with Heavy Hail", icon: "⛈️" }),
];

/// Look up a code; misses (and a missing code) fall back to [`UNKNOWN`].
pub fn lookup(code: Option<i32>) -> CodeEntry {
    code.and_then(|code| TABLE.iter().find(|(c, _)| *c == code).map(|(_, entry)| *entry))
        .unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(lookup(Some(0)).description, "Clear Sky");
        assert_eq!(lookup(Some(2)).icon, "⛅");
        assert_eq!(lookup(Some(95)).description, "Thunderstorm");
    }

    #[test]
    fn unmapped_code_falls_back() {
        assert_eq!(lookup(Some(999)), UNKNOWN);
        assert_eq!(lookup(Some(-1)).icon, "❔");
        assert_eq!(lookup(None).description, "Unknown");
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        let mut codes: Vec<i32> = TABLE.iter().map(|(c, _)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), TABLE.len());
    }
}
