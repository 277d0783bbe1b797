//! Simulated weather used when real data is missing or too short.
//!
//! Every value is drawn from a `StdRng` seeded with the simulator's own seed,
//! so one simulator always produces the same sequence.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::models::{Condition, CurrentConditions, DailySummary, SummarySource};

/// Icon codes cycled through by simulated days, by position
pub const SIMULATED_ICONS: [&str; 7] = ["01d", "02d", "03d", "04d", "10d", "11d", "13d"];
pub const SIMULATED_FORECAST_DESCRIPTION: &str = "simulated forecast";
pub const SIMULATED_CURRENT_DESCRIPTION: &str = "simulated conditions";
/// Base temperature when nothing better is known
pub const DEFAULT_BASE_TEMPERATURE: f64 = 22.0;

const TEMPERATURE_NOISE: f64 = 3.0;
const TEMPERATURE_SPREAD: f64 = 2.0;

/// Deterministic generator of simulated days
#[derive(Debug, Clone)]
pub struct ForecastSimulator {
    seed: u64,
    anchor: DateTime<Utc>,
}

impl ForecastSimulator {
    /// Simulator with a fresh random seed, day 0 at `anchor`
    #[must_use]
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self::with_seed(rand::rng().random(), anchor)
    }

    #[must_use]
    pub fn with_seed(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self { seed, anchor }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    /// `days` simulated summaries around `base_temperature`, entry `i`
    /// dated `anchor + i days`.
    #[must_use]
    pub fn generate(&self, base_temperature: f64, days: usize) -> Vec<DailySummary> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        (0..days)
            .map(|i| {
                let noise = rng.random_range(-TEMPERATURE_NOISE..TEMPERATURE_NOISE);
                let humidity = 55 + rng.random_range(0..25u8);
                let wind = 2.0 + rng.random_range(0.0..3.0);
                let temperature = base_temperature + noise;

                DailySummary {
                    day_timestamp: self.day_timestamp(i),
                    mean_temperature: temperature,
                    min_temperature: temperature - TEMPERATURE_SPREAD,
                    max_temperature: temperature + TEMPERATURE_SPREAD,
                    mean_humidity: humidity,
                    mean_wind_speed: wind,
                    representative_condition: Condition::new(
                        SIMULATED_ICONS[i % SIMULATED_ICONS.len()],
                        SIMULATED_FORECAST_DESCRIPTION,
                    ),
                    source: SummarySource::Simulated,
                }
            })
            .collect()
    }

    /// Placeholder current conditions shown when a lookup failed
    #[must_use]
    pub fn current_conditions(&self, name: &str, base_temperature: f64) -> CurrentConditions {
        CurrentConditions {
            name: name.to_string(),
            country: Some("XX".to_string()),
            temperature: base_temperature,
            feels_like: base_temperature - 1.0,
            humidity: 60,
            pressure: 1012.0,
            wind_speed: 3.0,
            visibility: Some(9000.0),
            condition: Condition::new("02d", SIMULATED_CURRENT_DESCRIPTION),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn day_timestamp(&self, offset: usize) -> i64 {
        let days = chrono::Duration::days(i64::try_from(offset).unwrap_or(0));
        self.anchor
            .checked_add_signed(days)
            .unwrap_or(self.anchor)
            .timestamp()
    }
}
