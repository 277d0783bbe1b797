//! External collaborators the core talks to.
//!
//! Both traits are implemented against OpenWeatherMap in [`crate::openweather`];
//! tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::Result;
use crate::models::{CurrentConditions, ForecastSample, GeoCandidate, Units};

/// Free-text place search
#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Search for places matching `query`, at most `limit` results in
    /// relevance order. Zero results is not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeoCandidate>>;
}

/// Weather data for a coordinate pair
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Short-interval forecast samples in the order the service lists them
    async fn fetch_forecast_samples(
        &self,
        latitude: f64,
        longitude: f64,
        units: Units,
    ) -> Result<Vec<ForecastSample>>;

    /// Current conditions
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
        units: Units,
    ) -> Result<CurrentConditions>;
}
