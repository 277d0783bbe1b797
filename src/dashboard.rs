//! Dashboard orchestration
//!
//! Resolves a place, fetches current conditions and forecast samples, and
//! shapes them into a [`DashboardView`]. Lookup failures on the city search
//! path degrade to a simulated view instead of an error.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::aggregation::{ForecastAggregator, summarize_days};
use crate::config::WeatherCastConfig;
use crate::location_resolver::{LocationResolver, UNBIASED_SEARCH_LIMIT};
use crate::models::{CurrentConditions, DailySummary, Location, Units};
use crate::services::{GeocodingService, WeatherService};
use crate::simulation::ForecastSimulator;
use crate::Result;

/// Name shown for the simulated fallback place
pub const DEMO_CITY: &str = "Demo City";
const DEMO_COUNTRY: &str = "XX";

/// Settings the dashboard needs from the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub country_bias: Option<String>,
    pub horizon_days: usize,
    pub fallback_base_temperature: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from_config(&WeatherCastConfig::default())
    }
}

impl DashboardSettings {
    #[must_use]
    pub fn from_config(config: &WeatherCastConfig) -> Self {
        Self {
            country_bias: config.country_bias().map(str::to_string),
            horizon_days: config.defaults.horizon_days,
            fallback_base_temperature: config.defaults.fallback_base_temperature,
        }
    }
}

/// Everything a caller needs to render one place
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<DailySummary>,
    pub units: Units,
    /// True when the whole view is made up
    pub simulated: bool,
    /// Why real data could not be shown
    pub fallback_reason: Option<String>,
}

/// Ties the resolver, the weather service and the aggregator together
pub struct WeatherDashboard<G, W> {
    resolver: LocationResolver<G>,
    weather: W,
    settings: DashboardSettings,
    seed: Option<u64>,
}

impl<G: GeocodingService, W: WeatherService> WeatherDashboard<G, W> {
    pub fn new(resolver: LocationResolver<G>, weather: W, settings: DashboardSettings) -> Self {
        Self {
            resolver,
            weather,
            settings,
            seed: None,
        }
    }

    /// Fix the simulator seed so padded days are reproducible
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn resolver(&self) -> &LocationResolver<G> {
        &self.resolver
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    fn simulator(&self) -> ForecastSimulator {
        let anchor = Utc::now();
        match self.seed {
            Some(seed) => ForecastSimulator::with_seed(seed, anchor),
            None => ForecastSimulator::new(anchor),
        }
    }

    /// Load a city by name, substituting a simulated view when the lookup
    /// or either fetch fails. Validation errors are returned.
    #[instrument(skip(self))]
    pub async fn load_city(&self, city: &str, units: Units) -> Result<DashboardView> {
        let bias = self.settings.country_bias.as_deref();

        let loaded = match self.resolver.resolve(city, bias).await {
            Ok(candidate) => self.load_location(candidate.into(), units).await,
            Err(e) => Err(e),
        };

        match loaded {
            Ok(view) => Ok(view),
            Err(e) if e.is_lookup_error() => {
                warn!("Showing simulated data for '{}': {}", city, e);
                Ok(self.simulated_view(units, e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Load a coordinate pair, e.g. from device geolocation
    #[instrument(skip(self))]
    pub async fn load_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        units: Units,
    ) -> Result<DashboardView> {
        let location = Location::new(latitude, longitude, format!("{latitude:.4}, {longitude:.4}"));
        self.load_location(location, units).await
    }

    /// Re-fetch a view in another unit system
    pub async fn refresh(&self, view: &DashboardView, units: Units) -> Result<DashboardView> {
        if view.simulated {
            let reason = view.fallback_reason.clone().unwrap_or_default();
            return Ok(self.simulated_view(units, reason));
        }
        self.load_location(view.location.clone(), units).await
    }

    /// Current temperature for a favorite city, `None` when nothing matches
    pub async fn quick_temperature(&self, city: &str, units: Units) -> Result<Option<f64>> {
        let query = match self.settings.country_bias.as_deref() {
            Some(country) => format!("{},{}", city.trim(), country),
            None => city.trim().to_string(),
        };

        let candidates = self
            .resolver
            .geocoder()
            .search(&query, UNBIASED_SEARCH_LIMIT)
            .await?;
        let Some(candidate) = candidates.into_iter().next() else {
            return Ok(None);
        };

        let current = self
            .weather
            .fetch_current(candidate.latitude, candidate.longitude, units)
            .await?;
        Ok(Some(current.temperature))
    }

    async fn load_location(&self, location: Location, units: Units) -> Result<DashboardView> {
        let (current, samples) = tokio::try_join!(
            self.weather
                .fetch_current(location.latitude, location.longitude, units),
            self.weather
                .fetch_forecast_samples(location.latitude, location.longitude, units),
        )?;

        let observed = summarize_days(&samples);
        let base_temperature = observed
            .first()
            .map_or(self.settings.fallback_base_temperature, |d| d.mean_temperature);
        let forecast = ForecastAggregator::new(self.simulator()).pad(
            observed,
            self.settings.horizon_days,
            base_temperature,
        );

        info!(
            "Loaded {} with {} forecast days",
            location.label(),
            forecast.len()
        );

        Ok(DashboardView {
            location,
            current,
            forecast,
            units,
            simulated: false,
            fallback_reason: None,
        })
    }

    fn simulated_view(&self, units: Units, reason: String) -> DashboardView {
        let simulator = self.simulator();
        let current =
            simulator.current_conditions(DEMO_CITY, self.settings.fallback_base_temperature);
        let forecast = ForecastAggregator::new(simulator).aggregate(
            &[],
            self.settings.horizon_days,
            current.temperature,
        );

        DashboardView {
            location: Location::with_country(
                current.latitude,
                current.longitude,
                DEMO_CITY.to_string(),
                DEMO_COUNTRY.to_string(),
            ),
            current,
            forecast,
            units,
            simulated: true,
            fallback_reason: Some(reason),
        }
    }
}
