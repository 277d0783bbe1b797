//! Integration tests for the OpenWeatherMap client and dashboard using wiremock.

use serde_json::json;
use weathercast::config::ApiConfig;
use weathercast::{
    DashboardSettings, DailySummary, GeocodingService, LocationResolver, OpenWeatherClient, Units,
    WeatherCastError, WeatherDashboard, WeatherService, summarize_days,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 2024-01-01T00:00:00Z
const JAN_1: i64 = 1_704_067_200;

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(&ApiConfig {
        api_key: Some("test-key".to_string()),
        geocoding_base_url: server.uri(),
        weather_base_url: server.uri(),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn geo(name: &str, country: &str, lat: f64, lon: f64) -> serde_json::Value {
    json!({"name": name, "country": country, "lat": lat, "lon": lon})
}

/// Three-hourly entries, `days` full days from Jan 1
fn forecast_body(days: i64) -> serde_json::Value {
    let list: Vec<_> = (0..days * 8)
        .map(|i| {
            json!({
                "dt": JAN_1 + i * 3 * 3_600,
                "main": {"temp": 20.0 + (i % 8) as f64, "humidity": 50},
                "weather": [{"icon": "03d", "description": "scattered clouds"}],
                "wind": {"speed": 2.0}
            })
        })
        .collect();
    json!({ "list": list })
}

fn current_body() -> serde_json::Value {
    json!({
        "name": "Kharar",
        "sys": {"country": "IN"},
        "main": {"temp": 29.4, "feels_like": 31.0, "humidity": 45, "pressure": 1006},
        "weather": [{"icon": "01d", "description": "clear sky"}],
        "wind": {"speed": 3.0},
        "visibility": 8000,
        "coord": {"lat": 30.74, "lon": 76.64}
    })
}

async fn mount_weather(server: &MockServer, days: i64) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(days)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_sends_query_limit_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Kharar,IN"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            geo("Khaira", "IN", 31.0, 75.0),
            geo("Kharar", "IN", 30.74, 76.64)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let candidates = client(&server).search("Kharar,IN", 5).await.unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1].name, "Kharar");
}

#[tokio::test]
async fn test_search_error_status_is_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = client(&server).search("Kharar", 5).await.unwrap_err();
    assert!(matches!(
        err,
        WeatherCastError::LookupFailed {
            status: Some(401),
            ..
        }
    ));
}

#[tokio::test]
async fn test_resolver_retries_without_bias() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Paris,IN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Paris"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([geo("Paris", "FR", 48.85, 2.35)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(client(&server));
    let selected = resolver.resolve("Paris", Some("IN")).await.unwrap();
    assert_eq!(selected.country, "FR");
}

#[tokio::test]
async fn test_fetch_forecast_samples_passes_units() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("units", "imperial"))
        .and(query_param("lat", "30.74"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(2)))
        .mount(&server)
        .await;

    let samples = client(&server)
        .fetch_forecast_samples(30.74, 76.64, Units::Imperial)
        .await
        .unwrap();
    assert_eq!(samples.len(), 16);
    assert_eq!(samples[0].timestamp_seconds, JAN_1);
}

#[tokio::test]
async fn test_forecast_keeps_service_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [
                {
                    "dt": JAN_1 + 3_600,
                    "main": {"temp": 18.0, "humidity": 70},
                    "weather": [{"icon": "10d", "description": "light rain"}],
                    "wind": {"speed": 2.0}
                },
                {
                    "dt": JAN_1,
                    "main": {"temp": 16.0, "humidity": 72},
                    "weather": [{"icon": "01d", "description": "clear sky"}],
                    "wind": {"speed": 1.0}
                }
            ]
        })))
        .mount(&server)
        .await;

    let samples = client(&server)
        .fetch_forecast_samples(30.74, 76.64, Units::Metric)
        .await
        .unwrap();
    assert_eq!(samples[0].timestamp_seconds, JAN_1 + 3_600);
    assert_eq!(samples[1].timestamp_seconds, JAN_1);

    // the last sample listed decides the day's condition
    let days = summarize_days(&samples);
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].representative_condition.icon, "01d");
    assert_eq!(days[0].day_timestamp, JAN_1);
}

#[tokio::test]
async fn test_malformed_forecast_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_forecast_samples(1.0, 1.0, Units::Metric)
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherCastError::Parse { .. }));
}

#[tokio::test]
async fn test_weather_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_current(1.0, 1.0, Units::Metric)
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherCastError::Api { .. }));
}

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([geo("Kharar", "IN", 30.74, 76.64)])),
        )
        .mount(&server)
        .await;
    mount_weather(&server, 3).await;

    let client = client(&server);
    let dashboard = WeatherDashboard::new(
        LocationResolver::new(client.clone()),
        client,
        DashboardSettings::default(),
    )
    .with_seed(5);

    let view = dashboard.load_city("Kharar", Units::Metric).await.unwrap();
    assert!(!view.simulated);
    assert_eq!(view.current.display_name(), "Kharar, IN");
    assert_eq!(view.forecast.len(), 7);

    let first = &view.forecast[0];
    assert_eq!(first.min_temperature, 20.0);
    assert_eq!(first.max_temperature, 27.0);
    assert_eq!(first.mean_temperature, 23.5);
    assert_eq!(first.format_temperature_range(), "27° / 20°");
    assert!(view.forecast[..3].iter().all(|d| !d.is_simulated()));
    assert!(view.forecast[3..].iter().all(DailySummary::is_simulated));
}

#[tokio::test]
async fn test_dashboard_simulates_when_lookup_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client(&server);
    let dashboard = WeatherDashboard::new(
        LocationResolver::new(client.clone()),
        client,
        DashboardSettings::default(),
    );

    let view = dashboard.load_city("Kharar", Units::Metric).await.unwrap();
    assert!(view.simulated);
    assert_eq!(view.current.display_name(), "Demo City, XX");
    assert_eq!(view.forecast.len(), 7);
    assert!(view.fallback_reason.is_some());
}
