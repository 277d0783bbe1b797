//! Location Resolution Module
//!
//! This module turns free-text place names (and coordinate input) into a
//! single best geocoding candidate, and serves autocomplete suggestions.

use crate::models::{GeoCandidate, Location, LocationInput};
use crate::services::GeocodingService;
use crate::{Result, WeatherCastError};
use tracing::debug;

/// Result cap for the country-biased search
pub const BIASED_SEARCH_LIMIT: usize = 5;
/// Result cap for the unbiased retry
pub const UNBIASED_SEARCH_LIMIT: usize = 1;
/// Shortest prefix that triggers a suggestion lookup
pub const MIN_SUGGESTION_CHARS: usize = 2;

/// Service for resolving location inputs
pub struct LocationResolver<G> {
    geocoder: G,
    suggestion_limit: usize,
}

impl<G: GeocodingService> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            suggestion_limit: BIASED_SEARCH_LIMIT,
        }
    }

    #[must_use]
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve a place name to the best matching candidate.
    ///
    /// Searches `"{query},{country_bias}"` first; when that yields nothing,
    /// retries with the bare query and a tighter cap. Collaborator errors
    /// are returned as-is without retrying.
    pub async fn resolve(&self, query: &str, country_bias: Option<&str>) -> Result<GeoCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherCastError::validation("Location cannot be empty"));
        }

        let candidates = match normalize_bias(country_bias) {
            Some(country) => {
                let biased = format!("{query},{country}");
                debug!("Geocoding '{}' (limit {})", biased, BIASED_SEARCH_LIMIT);
                let candidates = self.geocoder.search(&biased, BIASED_SEARCH_LIMIT).await?;

                if candidates.is_empty() {
                    debug!(
                        "No results for '{}', retrying without country bias",
                        biased
                    );
                    self.geocoder.search(query, UNBIASED_SEARCH_LIMIT).await?
                } else {
                    candidates
                }
            }
            None => {
                debug!("Geocoding '{}' (limit {})", query, BIASED_SEARCH_LIMIT);
                self.geocoder.search(query, BIASED_SEARCH_LIMIT).await?
            }
        };

        let selected = Self::select_best(candidates, query)
            .ok_or_else(|| WeatherCastError::not_found(query))?;

        debug!(
            "Selected location: {} ({:.4}, {:.4})",
            selected.display_name(),
            selected.latitude,
            selected.longitude
        );

        Ok(selected)
    }

    /// Resolve a parsed location input into a structured Location
    pub async fn resolve_location(
        &self,
        input: LocationInput,
        country_bias: Option<&str>,
    ) -> Result<Location> {
        match input {
            LocationInput::Coordinates(lat, lon) => {
                debug!("Using coordinates as-is: ({}, {})", lat, lon);
                Ok(Location::new(lat, lon, format!("{lat:.4}, {lon:.4}")))
            }
            LocationInput::Name(name) => Ok(self.resolve(&name, country_bias).await?.into()),
        }
    }

    /// Autocomplete candidates for a partially typed city name
    pub async fn suggest(
        &self,
        prefix: &str,
        country_bias: Option<&str>,
    ) -> Result<Vec<GeoCandidate>> {
        let prefix = prefix.trim();
        if prefix.chars().count() < MIN_SUGGESTION_CHARS {
            return Ok(Vec::new());
        }

        let query = match normalize_bias(country_bias) {
            Some(country) => format!("{prefix},{country}"),
            None => prefix.to_string(),
        };

        let suggestions = self.geocoder.search(&query, self.suggestion_limit).await?;
        debug!("{} suggestions for '{}'", suggestions.len(), query);
        Ok(suggestions)
    }

    /// Pick the candidate whose name equals the query (ignoring case),
    /// otherwise the first one in service order.
    #[must_use]
    pub fn select_best(candidates: Vec<GeoCandidate>, query: &str) -> Option<GeoCandidate> {
        let exact = candidates.iter().position(|c| c.matches_exactly(query));
        let index = exact.unwrap_or(0);
        candidates.into_iter().nth(index)
    }
}

fn normalize_bias(country_bias: Option<&str>) -> Option<&str> {
    country_bias.map(str::trim).filter(|c| !c.is_empty())
}
