//! `WeatherCast` - Weather dashboard core
//!
//! This library resolves free-text city names to coordinates, collapses
//! short-interval forecast samples into daily summaries padded with
//! simulated days, and keeps a list of favorite cities.

pub mod aggregation;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod favorites;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod openweather;
pub mod services;
pub mod simulation;

// Re-export core types for public API
pub use aggregation::{ForecastAggregator, summarize_days};
pub use config::WeatherCastConfig;
pub use dashboard::{DashboardSettings, DashboardView, WeatherDashboard};
pub use error::WeatherCastError;
pub use favorites::FavoritesStore;
pub use location_resolver::LocationResolver;
pub use models::{
    Condition, CurrentConditions, DailySummary, ForecastSample, GeoCandidate, Location,
    LocationInput, LocationParser, SummarySource, Units,
};
pub use openweather::OpenWeatherClient;
pub use services::{GeocodingService, WeatherService};
pub use simulation::ForecastSimulator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherCastError>;
