//! OpenWeatherMap client
//!
//! Implements [`GeocodingService`] and [`WeatherService`] over the direct
//! geocoding, 5-day/3-hour forecast and current weather endpoints. Responses
//! are deserialized into private wire structs and validated on the way into
//! the domain types.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ApiConfig;
use crate::models::{Condition, CurrentConditions, ForecastSample, GeoCandidate, Units};
use crate::services::{GeocodingService, WeatherService};
use crate::{Result, WeatherCastError};

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const USER_AGENT: &str = concat!("WeatherCast/", env!("CARGO_PKG_VERSION"));
const SLOW_RESPONSE_SECS: u64 = 5;

/// HTTP client for the OpenWeatherMap APIs
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    geocoding_base_url: String,
    weather_base_url: String,
}

impl OpenWeatherClient {
    /// Create a client from the API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherCastError::config(format!("Failed to create HTTP client: {e}")))?;

        let api_key = config.api_key.clone().unwrap_or_else(|| {
            warn!("No OpenWeatherMap API key configured, requests will be rejected");
            String::new()
        });

        Ok(Self {
            client,
            api_key,
            geocoding_base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
            weather_base_url: config.weather_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn geocoding_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/direct?q={}&limit={}&appid={}",
            self.geocoding_base_url,
            urlencoding::encode(query),
            limit,
            urlencoding::encode(&self.api_key)
        )
    }

    fn weather_url(&self, endpoint: &str, lat: f64, lon: f64, units: Units) -> String {
        format!(
            "{}/{}?lat={}&lon={}&units={}&appid={}",
            self.weather_base_url,
            endpoint,
            lat,
            lon,
            units.as_str(),
            urlencoding::encode(&self.api_key)
        )
    }

    /// GET a weather endpoint, mapping every failure to an API error
    async fn fetch_weather_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<T> {
        let url = self.weather_url(endpoint, lat, lon, units);
        debug!("Weather API request: {}/{}", self.weather_base_url, endpoint);

        let start_time = Instant::now();
        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Weather request failed: {}", e);
            WeatherCastError::api(format!("Unable to reach weather service: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Weather API returned {}: {}", status, body);
            return Err(WeatherCastError::api(format!(
                "Weather service returned {}",
                status.as_u16()
            )));
        }

        let parsed = read_json(response, endpoint).await.map_err(|e| match e {
            WeatherCastError::Parse { .. } => e,
            other => WeatherCastError::api(other.to_string()),
        })?;
        log_duration(endpoint, start_time);
        Ok(parsed)
    }
}

#[async_trait]
impl GeocodingService for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeoCandidate>> {
        info!("Geocoding location: '{}'", query);
        let start_time = Instant::now();

        let url = self.geocoding_url(query, limit);
        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Geocoding request failed: {}", e);
            WeatherCastError::lookup_failed(None, format!("Unable to reach geocoding service: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Geocoding API returned {}: {}", status, body);
            return Err(WeatherCastError::lookup_failed(
                Some(status.as_u16()),
                format!(
                    "Geocoding service returned {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string(),
            ));
        }

        let entries: Vec<GeoEntry> = read_json(response, "geocoding").await.map_err(|e| match e {
            WeatherCastError::Parse { .. } => e,
            other => WeatherCastError::lookup_failed(Some(status.as_u16()), other.to_string()),
        })?;

        let candidates = entries
            .into_iter()
            .map(GeoCandidate::try_from)
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Found {} candidates for '{}' in {:.3}s",
            candidates.len(),
            query,
            start_time.elapsed().as_secs_f64()
        );
        Ok(candidates)
    }
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_forecast_samples(
        &self,
        latitude: f64,
        longitude: f64,
        units: Units,
    ) -> Result<Vec<ForecastSample>> {
        info!(
            "Getting forecast for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let response: ForecastResponse = self
            .fetch_weather_json("forecast", latitude, longitude, units)
            .await?;

        // service order is kept; the last sample of a day picks its condition
        let samples = response
            .list
            .into_iter()
            .map(ForecastSample::try_from)
            .collect::<Result<Vec<_>>>()?;

        info!("Retrieved {} forecast samples", samples.len());
        Ok(samples)
    }

    #[instrument(skip(self))]
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
        units: Units,
    ) -> Result<CurrentConditions> {
        info!(
            "Getting current weather for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let response: CurrentResponse = self
            .fetch_weather_json("weather", latitude, longitude, units)
            .await?;
        CurrentConditions::try_from(response)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| WeatherCastError::api(format!("Failed to read {what} response: {e}")))?;

    serde_json::from_str(&body).map_err(|e| {
        error!("Failed to parse {} response: {}", what, e);
        WeatherCastError::parse(format!("Invalid {what} response: {e}"))
    })
}

fn log_duration(endpoint: &str, start_time: Instant) {
    let elapsed = start_time.elapsed();
    debug!("{} responded in {:.3}s", endpoint, elapsed.as_secs_f64());
    if elapsed.as_secs() > SLOW_RESPONSE_SECS {
        warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
    }
}

fn finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WeatherCastError::parse(format!("{field} is not a finite number")))
    }
}

fn percentage(field: &str, value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| WeatherCastError::parse(format!("{field} {value} is outside 0-100")))
}

fn first_condition(weather: Vec<WeatherEntry>, context: &str) -> Result<Condition> {
    weather
        .into_iter()
        .next()
        .map(|w| Condition::new(w.icon, w.description))
        .ok_or_else(|| WeatherCastError::parse(format!("{context} has no weather condition")))
}

// Wire formats

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainEntry,
    weather: Vec<WeatherEntry>,
    wind: WindEntry,
}

#[derive(Debug, Deserialize)]
struct MainEntry {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    humidity: i64,
    #[serde(default)]
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindEntry {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    #[serde(default)]
    sys: Option<SysEntry>,
    main: MainEntry,
    weather: Vec<WeatherEntry>,
    wind: WindEntry,
    #[serde(default)]
    visibility: Option<f64>,
    coord: CoordEntry,
}

#[derive(Debug, Deserialize)]
struct SysEntry {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoordEntry {
    lat: f64,
    lon: f64,
}

impl TryFrom<GeoEntry> for GeoCandidate {
    type Error = WeatherCastError;

    fn try_from(entry: GeoEntry) -> Result<Self> {
        let latitude = finite("latitude", entry.lat)?;
        let longitude = finite("longitude", entry.lon)?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherCastError::parse(format!(
                "Coordinates out of range for '{}': {latitude}, {longitude}",
                entry.name
            )));
        }

        Ok(GeoCandidate {
            name: entry.name,
            state: entry.state.filter(|s| !s.is_empty()),
            country: entry.country.unwrap_or_default(),
            latitude,
            longitude,
        })
    }
}

impl TryFrom<ForecastEntry> for ForecastSample {
    type Error = WeatherCastError;

    fn try_from(entry: ForecastEntry) -> Result<Self> {
        let context = format!("forecast entry at {}", entry.dt);
        Ok(ForecastSample {
            timestamp_seconds: entry.dt,
            temperature: finite("temperature", entry.main.temp)?,
            humidity: percentage("humidity", entry.main.humidity)?,
            wind_speed: finite("wind speed", entry.wind.speed)?,
            condition: first_condition(entry.weather, &context)?,
        })
    }
}

impl TryFrom<CurrentResponse> for CurrentConditions {
    type Error = WeatherCastError;

    fn try_from(response: CurrentResponse) -> Result<Self> {
        let temperature = finite("temperature", response.main.temp)?;
        let feels_like = finite(
            "feels-like temperature",
            response.main.feels_like.unwrap_or(temperature),
        )?;
        let pressure = response
            .main
            .pressure
            .ok_or_else(|| WeatherCastError::parse("current weather has no pressure"))
            .and_then(|p| finite("pressure", p))?;

        Ok(CurrentConditions {
            condition: first_condition(response.weather, "current weather")?,
            country: response
                .sys
                .and_then(|s| s.country)
                .filter(|c| !c.is_empty()),
            temperature,
            feels_like,
            humidity: percentage("humidity", response.main.humidity)?,
            pressure,
            wind_speed: finite("wind speed", response.wind.speed)?,
            visibility: response.visibility.filter(|v| v.is_finite()),
            latitude: finite("latitude", response.coord.lat)?,
            longitude: finite("longitude", response.coord.lon)?,
            name: response.name,
        })
    }
}
