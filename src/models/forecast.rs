//! Forecast samples and the daily summaries derived from them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition as reported by the service: an icon code plus text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Icon code, e.g. "10d"
    pub icon: String,
    /// Human-readable description, e.g. "light rain"
    pub description: String,
}

impl Condition {
    #[must_use]
    pub fn new(icon: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            description: description.into(),
        }
    }
}

/// One short-interval (typically 3-hour) forecast sample
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSample {
    /// UTC epoch seconds
    pub timestamp_seconds: i64,
    /// Temperature in the requested unit system
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s (mph for imperial units)
    pub wind_speed: f64,
    pub condition: Condition,
}

impl ForecastSample {
    /// Timestamp as a UTC date-time, `None` when out of chrono's range
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp_seconds, 0)
    }

    /// Calendar date in UTC; this is the grouping key for daily summaries
    #[must_use]
    pub fn utc_date(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date_naive())
    }
}

/// Where a daily summary came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    /// Reduced from real forecast samples
    Observed,
    /// Produced by the simulated fallback generator
    Simulated,
}

/// Daily reduction of a bucket of forecast samples
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySummary {
    /// Timestamp of the last sample in the bucket (UTC epoch seconds)
    pub day_timestamp: i64,
    pub mean_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Rounded mean humidity percentage
    pub mean_humidity: u8,
    pub mean_wind_speed: f64,
    /// Condition of the last sample appended to the bucket
    pub representative_condition: Condition,
    pub source: SummarySource,
}

impl DailySummary {
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.source == SummarySource::Simulated
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.day_timestamp, 0).map(|ts| ts.date_naive())
    }

    /// Short weekday and month/day, e.g. ("Mon", "Jan 1")
    #[must_use]
    pub fn day_labels(&self) -> (String, String) {
        match self.date() {
            Some(date) => (
                date.format("%a").to_string(),
                date.format("%b %-d").to_string(),
            ),
            None => ("---".to_string(), "---".to_string()),
        }
    }

    /// Rounded high/low pair with degree marks, e.g. "24° / 18°"
    #[must_use]
    pub fn format_temperature_range(&self) -> String {
        format!(
            "{:.0}° / {:.0}°",
            self.max_temperature.round(),
            self.min_temperature.round()
        )
    }

    /// Wind speed converted from m/s to km/h
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.0} km/h", (self.mean_wind_speed * 3.6).round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(day_timestamp: i64) -> DailySummary {
        DailySummary {
            day_timestamp,
            mean_temperature: 21.4,
            min_temperature: 17.6,
            max_temperature: 24.5,
            mean_humidity: 60,
            mean_wind_speed: 3.0,
            representative_condition: Condition::new("10d", "light rain"),
            source: SummarySource::Observed,
        }
    }

    #[test]
    fn test_sample_utc_date() {
        let sample = ForecastSample {
            // 2024-01-01T23:50:00Z
            timestamp_seconds: 1_704_153_000,
            temperature: 10.0,
            humidity: 50,
            wind_speed: 1.0,
            condition: Condition::new("01n", "clear sky"),
        };
        assert_eq!(
            sample.utc_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_out_of_range_timestamp_has_no_date() {
        let sample = ForecastSample {
            timestamp_seconds: i64::MAX,
            temperature: 10.0,
            humidity: 50,
            wind_speed: 1.0,
            condition: Condition::new("01n", "clear sky"),
        };
        assert!(sample.utc_date().is_none());
    }

    #[test]
    fn test_summary_formatting() {
        // 2024-01-01T12:00:00Z, a Monday
        let day = summary(1_704_110_400);
        assert_eq!(day.day_labels(), ("Mon".to_string(), "Jan 1".to_string()));
        assert_eq!(day.format_temperature_range(), "25° / 18°");
        assert_eq!(day.format_wind(), "11 km/h");
        assert!(!day.is_simulated());
    }

    #[test]
    fn test_source_serializes_lowercase() {
        let json = serde_json::to_string(&SummarySource::Simulated).unwrap();
        assert_eq!(json, "\"simulated\"");
    }
}
