//! Integration tests for `IpLocationProvider` using `wiremock`.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use djbook_core::{Coordinates, IpLocationConfig, IpLocationProvider, LocationError, LocationProvider};

fn provider_for(server: &MockServer, timeout: Duration) -> IpLocationProvider {
    IpLocationProvider::new(IpLocationConfig {
        url: format!("{}/json", server.uri()),
        timeout,
    })
    .expect("provider should build")
}

#[tokio::test]
async fn successful_lookup_yields_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "city": "Bengaluru",
            "lat": 12.97,
            "lon": 77.59
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coordinates = provider_for(&server, Duration::from_secs(5))
        .acquire_location()
        .await
        .expect("lookup should succeed");
    assert_eq!(coordinates, Coordinates::new(12.97, 77.59).unwrap());
}

#[tokio::test]
async fn failed_lookup_is_unavailable_with_reason() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&server)
        .await;

    let error = provider_for(&server, Duration::from_secs(5))
        .acquire_location()
        .await
        .unwrap_err();
    assert_eq!(error, LocationError::Unavailable("private range".to_string()));
}

#[tokio::test]
async fn forbidden_lookup_is_permission_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let error = provider_for(&server, Duration::from_secs(5))
        .acquire_location()
        .await
        .unwrap_err();
    assert!(matches!(error, LocationError::PermissionDenied(_)));
}

#[tokio::test]
async fn out_of_range_coordinates_are_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "lat": 123.0,
            "lon": 77.59
        })))
        .mount(&server)
        .await;

    let error = provider_for(&server, Duration::from_secs(5))
        .acquire_location()
        .await
        .unwrap_err();
    assert!(matches!(error, LocationError::Unavailable(_)));
}

#[tokio::test]
async fn slow_lookup_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "lat": 1.0, "lon": 2.0 }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let error = provider_for(&server, Duration::from_millis(100))
        .acquire_location()
        .await
        .unwrap_err();
    assert_eq!(error, LocationError::Timeout);
}
