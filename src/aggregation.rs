//! Forecast Aggregation Module
//!
//! Collapses a time-ordered series of short-interval forecast samples into
//! one summary per UTC calendar day, then pads the result to a fixed horizon
//! with simulated days so there is always something to show.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Condition, DailySummary, ForecastSample, SummarySource};
use crate::simulation::ForecastSimulator;

/// Days shown by the dashboard unless configured otherwise
pub const DEFAULT_HORIZON_DAYS: usize = 7;

/// Samples collected for one UTC date
struct DayBucket {
    temperatures: Vec<f64>,
    humidities: Vec<u8>,
    wind_speeds: Vec<f64>,
    last_timestamp: i64,
    condition: Condition,
}

impl DayBucket {
    fn new(sample: &ForecastSample) -> Self {
        Self {
            temperatures: Vec::new(),
            humidities: Vec::new(),
            wind_speeds: Vec::new(),
            last_timestamp: sample.timestamp_seconds,
            condition: sample.condition.clone(),
        }
    }

    fn push(&mut self, sample: &ForecastSample) {
        self.temperatures.push(sample.temperature);
        self.humidities.push(sample.humidity);
        self.wind_speeds.push(sample.wind_speed);
        // last write wins for both the timestamp and the condition
        self.last_timestamp = sample.timestamp_seconds;
        self.condition = sample.condition.clone();
    }

    fn into_summary(self) -> DailySummary {
        let min = self.temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .temperatures
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        // float summation can land a hair outside the extrema
        let mean = average(&self.temperatures).clamp(min, max);

        let humidity_sum: u32 = self.humidities.iter().map(|&h| u32::from(h)).sum();
        let mean_humidity = (f64::from(humidity_sum) / self.humidities.len() as f64).round() as u8;

        DailySummary {
            day_timestamp: self.last_timestamp,
            mean_temperature: mean,
            min_temperature: min,
            max_temperature: max,
            mean_humidity,
            mean_wind_speed: average(&self.wind_speeds),
            representative_condition: self.condition,
            source: SummarySource::Observed,
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Group samples by UTC calendar date and reduce each group, keeping the
/// order in which dates are first seen.
///
/// Samples with an unrepresentable timestamp or a non-finite reading are
/// skipped.
#[must_use]
pub fn summarize_days(samples: &[ForecastSample]) -> Vec<DailySummary> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut buckets: HashMap<NaiveDate, DayBucket> = HashMap::new();

    for sample in samples {
        if !sample.temperature.is_finite() || !sample.wind_speed.is_finite() {
            debug!(
                "Skipping sample at {} with non-finite readings",
                sample.timestamp_seconds
            );
            continue;
        }
        let Some(date) = sample.utc_date() else {
            debug!(
                "Skipping sample with out-of-range timestamp {}",
                sample.timestamp_seconds
            );
            continue;
        };

        buckets
            .entry(date)
            .or_insert_with(|| {
                order.push(date);
                DayBucket::new(sample)
            })
            .push(sample);
    }

    order
        .into_iter()
        .filter_map(|date| buckets.remove(&date))
        .map(DayBucket::into_summary)
        .collect()
}

/// Turns raw samples into exactly `horizon_days` daily summaries
#[derive(Debug, Clone)]
pub struct ForecastAggregator {
    simulator: ForecastSimulator,
}

impl ForecastAggregator {
    #[must_use]
    pub fn new(simulator: ForecastSimulator) -> Self {
        Self { simulator }
    }

    #[must_use]
    pub fn simulator(&self) -> &ForecastSimulator {
        &self.simulator
    }

    /// Summarize `samples` per UTC day and pad or truncate to `horizon_days`.
    ///
    /// Never fails: empty input yields a fully simulated forecast around
    /// `fallback_base_temperature`.
    #[must_use]
    pub fn aggregate(
        &self,
        samples: &[ForecastSample],
        horizon_days: usize,
        fallback_base_temperature: f64,
    ) -> Vec<DailySummary> {
        let observed = summarize_days(samples);
        debug!(
            "Summarized {} samples into {} observed days",
            samples.len(),
            observed.len()
        );
        self.pad(observed, horizon_days, fallback_base_temperature)
    }

    /// Truncate `days` to `horizon_days`, or fill the shortfall with the
    /// simulated entries at the same positions.
    #[must_use]
    pub fn pad(
        &self,
        mut days: Vec<DailySummary>,
        horizon_days: usize,
        base_temperature: f64,
    ) -> Vec<DailySummary> {
        if days.len() >= horizon_days {
            days.truncate(horizon_days);
            return days;
        }

        let observed = days.len();
        debug!(
            "Padding {} observed days with {} simulated days",
            observed,
            horizon_days - observed
        );
        days.extend(
            self.simulator
                .generate(base_temperature, horizon_days)
                .into_iter()
                .skip(observed),
        );
        days
    }
}
