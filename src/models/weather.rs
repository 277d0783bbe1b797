//! Current conditions and unit system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Condition;
use crate::WeatherCastError;

/// Unit system passed through to the weather service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius, m/s
    #[default]
    Metric,
    /// Fahrenheit, mph
    Imperial,
    /// Kelvin, m/s
    Standard,
}

impl Units {
    /// Query token understood by the weather service
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    /// Celsius/Fahrenheit toggle; standard switches to metric
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial | Units::Standard => Units::Metric,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = WeatherCastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            "standard" | "k" | "kelvin" => Ok(Units::Standard),
            other => Err(WeatherCastError::validation(format!(
                "Unknown unit system '{other}'. Use metric, imperial or standard"
            ))),
        }
    }
}

/// Current weather conditions at a place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Place name reported by the weather service
    pub name: String,
    /// Country code, when reported
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    pub wind_speed: f64,
    /// Visibility in meters
    pub visibility: Option<f64>,
    pub condition: Condition,
    pub latitude: f64,
    pub longitude: f64,
}

impl CurrentConditions {
    /// "Name, CC" or just the name
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self, units: Units) -> String {
        format!("{:.0}{}", self.temperature.round(), units.symbol())
    }

    /// Wind speed converted from m/s to km/h
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.0} km/h", (self.wind_speed * 3.6).round())
    }

    /// Visibility in kilometers with one decimal
    #[must_use]
    pub fn format_visibility(&self) -> String {
        match self.visibility {
            Some(meters) => format!("{:.1} km", meters / 1000.0),
            None => "-- km".to_string(),
        }
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{:.0} hPa", self.pressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn conditions() -> CurrentConditions {
        CurrentConditions {
            name: "Kharar".to_string(),
            country: Some("IN".to_string()),
            temperature: 31.6,
            feels_like: 34.2,
            humidity: 48,
            pressure: 1006.0,
            wind_speed: 2.5,
            visibility: Some(9000.0),
            condition: Condition::new("01d", "clear sky"),
            latitude: 30.74,
            longitude: 76.65,
        }
    }

    #[rstest]
    #[case("metric", Units::Metric)]
    #[case("Imperial", Units::Imperial)]
    #[case("f", Units::Imperial)]
    #[case("kelvin", Units::Standard)]
    fn test_units_from_str(#[case] input: &str, #[case] expected: Units) {
        assert_eq!(input.parse::<Units>().unwrap(), expected);
    }

    #[test]
    fn test_units_unknown() {
        assert!("rankine".parse::<Units>().is_err());
    }

    #[test]
    fn test_units_toggle() {
        assert_eq!(Units::Metric.toggled(), Units::Imperial);
        assert_eq!(Units::Imperial.toggled(), Units::Metric);
        assert_eq!(Units::Standard.toggled(), Units::Metric);
        assert_eq!(Units::Imperial.as_str(), "imperial");
    }

    #[test]
    fn test_current_formatting() {
        let current = conditions();
        assert_eq!(current.display_name(), "Kharar, IN");
        assert_eq!(current.format_temperature(Units::Metric), "32°C");
        assert_eq!(current.format_wind(), "9 km/h");
        assert_eq!(current.format_visibility(), "9.0 km");
        assert_eq!(current.format_pressure(), "1006 hPa");
    }
}
