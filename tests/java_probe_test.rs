//! Integration tests for the Java status probe using wiremock
//!
//! These tests validate how status API answers map to snapshots.

mod common;

use beacon::models::StatusSnapshot;
use beacon::probe::{JavaProbe, ProbeError, Prober, StatusProbe};
use common::{java_server, mount_status, offline_body, online_body};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test an online server maps players and version
#[tokio::test]
async fn test_online_server() {
    let mock_server = MockServer::start().await;
    let spec = java_server("Hub", "hub.example.net");
    mount_status(&mock_server, &spec, online_body(5, 100, "Paper 1.21.1")).await;

    let probe = JavaProbe::with_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
    let snapshot = probe.query(&spec).await.unwrap();

    assert_eq!(snapshot, StatusSnapshot::online("5/100", "Paper 1.21.1"));
}

/// Test an offline answer is unreachable with placeholders
#[tokio::test]
async fn test_offline_server() {
    let mock_server = MockServer::start().await;
    let spec = java_server("Hub", "hub.example.net");
    mount_status(&mock_server, &spec, offline_body()).await;

    let probe = JavaProbe::with_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
    let snapshot = probe.query(&spec).await.unwrap();

    assert!(!snapshot.reachable);
    assert_eq!(snapshot.player_summary, "N/A");
    assert_eq!(snapshot.version_label, "Unknown");
}

/// Test a server error is reported with its status code
#[tokio::test]
async fn test_server_error() {
    let mock_server = MockServer::start().await;
    let spec = java_server("Hub", "hub.example.net");

    Mock::given(method("GET"))
        .and(path("/2/hub.example.net:25565"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let probe = JavaProbe::with_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
    let result = probe.query(&spec).await;

    assert!(matches!(result, Err(ProbeError::Status(500))));
}

/// Test a malformed body is a decode error
#[tokio::test]
async fn test_malformed_json() {
    let mock_server = MockServer::start().await;
    let spec = java_server("Hub", "hub.example.net");
    mount_status(&mock_server, &spec, "<html>rate limited</html>".to_string()).await;

    let probe = JavaProbe::with_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
    let result = probe.query(&spec).await;

    assert!(matches!(result, Err(ProbeError::Decode(_))));
}

/// Test a slow API hits the request timeout
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;
    let spec = java_server("Hub", "hub.example.net");

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(online_body(1, 10, "1.21"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let probe = JavaProbe::with_base_url(&mock_server.uri(), Duration::from_millis(200)).unwrap();
    let result = probe.query(&spec).await;

    assert!(matches!(result, Err(ProbeError::Timeout(200))));
}

/// Test probe failures collapse to unreachable at the trait boundary
#[tokio::test]
async fn test_prober_maps_failures_to_unreachable() {
    let mock_server = MockServer::start().await;
    let spec = java_server("Hub", "hub.example.net");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let prober = Prober::with_api_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
    assert_eq!(prober.probe(&spec).await, StatusSnapshot::unreachable());
}

/// Test a refused connection is unreachable, not an error
#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    let prober = Prober::with_api_base_url("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let snapshot = prober.probe(&java_server("Hub", "hub.example.net")).await;

    assert_eq!(snapshot, StatusSnapshot::unreachable());
}
