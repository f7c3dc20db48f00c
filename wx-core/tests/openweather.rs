//! OpenWeatherClient against a mocked provider.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wx_core::{Endpoint, OpenWeatherClient, Report, Units, WeatherError, WeatherProvider, fetch_report};

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new("TEST_KEY".to_string(), Units::Metric, server.uri())
}

#[tokio::test]
async fn current_sends_location_key_and_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris, FR"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Paris",
            "sys": { "country": "FR" },
            "main": { "temp": 18.3, "humidity": 55 },
            "wind": { "speed": 2.1 },
            "weather": [{ "description": "few clouds" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = fetch_report(&client(&server), Endpoint::Current, "Paris, FR").await.unwrap();

    match report {
        Report::Current(record) => {
            assert_eq!(record.location, "Paris, FR");
            assert_eq!(record.temperature, 18.3);
        }
        other => panic!("unexpected report: {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_is_provider_error_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).fetch(Endpoint::Current, "Atlantis").await.unwrap_err();

    match err {
        WeatherError::Provider { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let err = client(&server).fetch(Endpoint::Forecast, "Oslo").await.unwrap_err();
    assert!(matches!(err, WeatherError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_network_error_without_api_key() {
    // Nothing listens on port 1.
    let client =
        OpenWeatherClient::new("SECRET_KEY_123".to_string(), Units::Metric, "http://127.0.0.1:1");

    let err = client.fetch(Endpoint::Current, "Oslo").await.unwrap_err();
    assert!(matches!(err, WeatherError::Network(_)), "got {err:?}");

    let msg = err.to_string();
    assert!(msg.contains("127.0.0.1:1/data/2.5/weather"), "{msg}");
    assert!(!msg.contains("SECRET_KEY_123"), "{msg}");
    assert!(!format!("{err:?}").contains("SECRET_KEY_123"));
}

#[tokio::test]
async fn empty_location_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).fetch(Endpoint::Current, "").await.unwrap_err();
    assert!(matches!(err, WeatherError::Usage(_)));
}

#[tokio::test]
async fn alerts_geocode_then_query_one_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Miami, US"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Miami", "lat": 25.77, "lon": -80.19, "country": "US" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .and(query_param("lat", "25.77"))
        .and(query_param("lon", "-80.19"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "temp": 29.0, "humidity": 78, "wind_speed": 6.2,
                "weather": [{ "description": "thunderstorm" }]
            },
            "alerts": [{
                "sender_name": "NWS Miami",
                "event": "Hurricane Warning",
                "start": 1_700_000_000,
                "end": 1_700_100_000,
                "description": "Take shelter."
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = fetch_report(&client(&server), Endpoint::Alerts, "Miami, US").await.unwrap();

    let Report::Alerts(record) = report else {
        panic!("expected alerts report");
    };
    assert_eq!(record.location, "Miami, US");
    let alerts = record.alerts.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].event, "Hurricane Warning");
}

#[tokio::test]
async fn alerts_for_unknown_location_is_provider_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/3.0/onecall"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).fetch(Endpoint::Alerts, "Nowhere").await.unwrap_err();
    match err {
        WeatherError::Provider { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("Nowhere"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
