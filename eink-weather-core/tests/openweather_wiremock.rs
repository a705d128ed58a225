//! Integration tests for the OpenWeather client using wiremock.
//!
//! These tests run both legs of a zip-code fetch against a mock HTTP server.

use std::{sync::Arc, time::Duration};

use eink_weather_core::{
    IconSet, OpenWeatherProvider, RequestStage, UiState, WeatherError, WeatherProvider,
    WeatherStateMachine, WeatherView,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "TEST_KEY";

fn zip_response() -> serde_json::Value {
    serde_json::json!({
        "zip": "22903",
        "name": "Charlottesville",
        "lat": 38.0,
        "lon": -78.5,
        "country": "US"
    })
}

fn conditions_response() -> serde_json::Value {
    serde_json::json!({
        "weather": [{"icon": "01d", "description": "clear sky"}],
        "main": {"temp": 22.5, "humidity": 40},
        "wind": {"speed": 3.1},
        "name": "Charlottesville"
    })
}

/// Create a test client configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_client(mock_server: &MockServer, timeout: Duration) -> OpenWeatherProvider {
    OpenWeatherProvider::new(mock_server.uri(), timeout).expect("Failed to create client")
}

async fn mount_geocode(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .and(query_param("zip", "22903"))
        .and(query_param("appid", API_KEY))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

async fn mount_conditions(mock_server: &MockServer, response: ResponseTemplate, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_fetch_by_zip_success() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, ResponseTemplate::new(200).set_body_json(zip_response())).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "38"))
        .and(query_param("lon", "-78.5"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conditions_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let snapshot = result.unwrap();

    assert_eq!(snapshot.location_name, "Charlottesville");
    assert!((snapshot.temperature_c - 22.5).abs() < f64::EPSILON);
    assert_eq!(snapshot.humidity_pct, 40);
    assert!((snapshot.wind_speed_mps - 3.1).abs() < f64::EPSILON);
    assert_eq!(snapshot.country, "US");
    assert_eq!(snapshot.icon_code(), "01d");
}

#[tokio::test]
async fn test_snapshot_uses_conditions_name_not_geocode_name() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, ResponseTemplate::new(200).set_body_json(zip_response())).await;

    let mut body = conditions_response();
    body["name"] = serde_json::json!("Ivy");
    body["main"]["temp"] = serde_json::json!(-4.25);
    mount_conditions(&mock_server, ResponseTemplate::new(200).set_body_json(body), 1).await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let snapshot = client.fetch_by_zip("22903", API_KEY).await.unwrap();

    assert_eq!(snapshot.location_name, "Ivy");
    assert!((snapshot.temperature_c + 4.25).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_state_machine_scenario_renders_clear_sky() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"lat": 38.0, "lon": -78.5})),
    )
    .await;
    mount_conditions(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(conditions_response()),
        1,
    )
    .await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let machine = WeatherStateMachine::new(Arc::new(client));
    machine.request_refresh("22903", API_KEY).await.unwrap();

    let UiState::Success(snapshot) = machine.current() else {
        panic!("expected success, got {:?}", machine.current());
    };

    let primary = WeatherView::new(&snapshot, IconSet::Primary);
    assert_eq!(primary.temperature, "23°C");
    assert_eq!(primary.description, "CLEAR SKY");
    assert_eq!(primary.icon_path, "weatherIcons/clear_day.svg");

    let alternate = WeatherView::new(&snapshot, IconSet::Alternate);
    assert_eq!(alternate.icon_path, "weatherIconsv2/Sun.svg");
}

// ============================================================================
// Error scenarios
// ============================================================================

#[tokio::test]
async fn test_geocode_not_found_is_lookup_error_and_skips_conditions() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        ResponseTemplate::new(404)
            .set_body_json(serde_json::json!({"cod": "404", "message": "not found"})),
    )
    .await;
    mount_conditions(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(conditions_response()),
        0,
    )
    .await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    match result {
        Err(WeatherError::Lookup { zip, reason }) => {
            assert_eq!(zip, "22903");
            assert!(reason.contains("404"), "unexpected reason: {reason}");
        }
        other => panic!("Expected Lookup error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_geocode_without_coordinates_is_lookup_error() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Nowhere"})),
    )
    .await;
    mount_conditions(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(conditions_response()),
        0,
    )
    .await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    assert!(matches!(result, Err(WeatherError::Lookup { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_geocode_invalid_json_is_lookup_error() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    assert!(matches!(result, Err(WeatherError::Lookup { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_empty_zip_is_rejected_without_network_calls() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let result = client.fetch_by_zip("  ", API_KEY).await;

    assert!(matches!(result, Err(WeatherError::Lookup { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_conditions_server_error_is_fetch_error() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, ResponseTemplate::new(200).set_body_json(zip_response())).await;
    mount_conditions(
        &mock_server,
        ResponseTemplate::new(401).set_body_string("Invalid API key"),
        1,
    )
    .await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    match result {
        Err(WeatherError::Fetch(reason)) => {
            assert!(reason.contains("401"), "unexpected reason: {reason}");
            assert!(reason.contains("Invalid API key"));
        }
        other => panic!("Expected Fetch error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_conditions_unexpected_shape_is_fetch_error() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, ResponseTemplate::new(200).set_body_json(zip_response())).await;
    mount_conditions(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"unexpected": true})),
        1,
    )
    .await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    assert!(matches!(result, Err(WeatherError::Fetch(_))), "got: {result:?}");
}

#[tokio::test]
async fn test_slow_geocode_times_out() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(zip_response())
            .set_delay(Duration::from_secs(5)),
    )
    .await;
    mount_conditions(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(conditions_response()),
        0,
    )
    .await;

    let client = create_test_client(&mock_server, Duration::from_secs(1));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    match result {
        Err(WeatherError::Timeout(stage)) => assert_eq!(stage, RequestStage::Geocode),
        other => panic!("Expected Timeout error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_conditions_times_out() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, ResponseTemplate::new(200).set_body_json(zip_response())).await;
    mount_conditions(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(conditions_response())
            .set_delay(Duration::from_secs(5)),
        1,
    )
    .await;

    let client = create_test_client(&mock_server, Duration::from_secs(1));
    let result = client.fetch_by_zip("22903", API_KEY).await;

    match result {
        Err(WeatherError::Timeout(stage)) => assert_eq!(stage, RequestStage::Conditions),
        other => panic!("Expected Timeout error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_fetch_surfaces_as_error_state() {
    let mock_server = MockServer::start().await;
    mount_geocode(&mock_server, ResponseTemplate::new(200).set_body_json(zip_response())).await;
    mount_conditions(&mock_server, ResponseTemplate::new(503), 1).await;

    let client = create_test_client(&mock_server, Duration::from_secs(5));
    let machine = WeatherStateMachine::new(Arc::new(client));
    machine.request_refresh("22903", API_KEY).await.unwrap();

    match machine.current() {
        UiState::Error(message) => {
            assert!(message.starts_with("Failed to fetch current weather"), "got: {message}");
            assert!(message.contains("503"));
        }
        other => panic!("Expected Error state, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_lookup_error() {
    // Reserve a port, then release it so connections are refused.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client =
        OpenWeatherProvider::new(format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
            .unwrap();
    let result = client.fetch_by_zip("22903", API_KEY).await;

    assert!(
        matches!(result, Err(WeatherError::Lookup { .. }) | Err(WeatherError::Timeout(_))),
        "got: {result:?}"
    );
}
