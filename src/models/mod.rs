//! Data models for the WeatherCast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: geocoding candidates, resolved places and user input
//! - Forecast: short-interval samples and daily summaries
//! - Weather: current conditions and unit system

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{Condition, DailySummary, ForecastSample, SummarySource};
pub use location::{GeoCandidate, Location, LocationInput, LocationParser};
pub use weather::{CurrentConditions, Units};
