//! Location model for geocoding candidates and resolved places

use serde::{Deserialize, Serialize};

use crate::WeatherCastError;

/// One match returned by a geocoding service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeoCandidate {
    /// Place name as reported by the service
    pub name: String,
    /// State or region, when the service knows one
    pub state: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoCandidate {
    /// "City, State, Country", or "City, Country" without a state
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }

    /// Case-insensitive exact comparison against a free-text query
    #[must_use]
    pub fn matches_exactly(&self, query: &str) -> bool {
        self.name.to_lowercase() == query.to_lowercase()
    }
}

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            country: None,
        }
    }

    /// Create location with country
    #[must_use]
    pub fn with_country(latitude: f64, longitude: f64, name: String, country: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            country: Some(country),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Name with the country suffix when known
    #[must_use]
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

impl From<GeoCandidate> for Location {
    fn from(candidate: GeoCandidate) -> Self {
        Location::with_country(
            candidate.latitude,
            candidate.longitude,
            candidate.name,
            candidate.country,
        )
    }
}

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Coordinates (latitude, longitude), e.g. from device geolocation
    Coordinates(f64, f64),
    /// Free-text place name
    Name(String),
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse location input (coordinates or city names)
    pub fn parse(input: &str) -> crate::Result<LocationInput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(WeatherCastError::validation("Location cannot be empty"));
        }

        if let Some((lat, lon)) = Self::parse_coordinates(input) {
            return Ok(LocationInput::Coordinates(lat, lon));
        }

        Ok(LocationInput::Name(input.to_string()))
    }

    /// Parse coordinates from string like "28.6139,77.2090" or "28.6139 77.2090"
    fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return None;
        };

        let lat = lat.parse::<f64>().ok()?;
        let lon = lon.parse::<f64>().ok()?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        Some((lat, lon))
    }
}
