// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! HttpTransport against a mock ClusterFox server

use clusterfox_agent::{
    AgentError, FailureKind, HttpTransport, ModuleClient, ModuleConfig, ModuleKind,
    ModuleTransport, SensorModule, SensorValue,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(server.uri(), Duration::from_secs(2)).unwrap())
}

fn client_for(config: ModuleConfig, server: &MockServer) -> ModuleClient {
    let transport: Arc<dyn ModuleTransport> = transport(server);
    ModuleClient::new(config, transport).unwrap()
}

#[tokio::test]
async fn test_sensor_registration_uses_query_and_stores_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/register"))
        .and(query_param("umid", "air-quality-003"))
        .and(query_param("type", "air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Module registered successfully",
            "session_id": "f00dfeed",
            "status": "new"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ModuleConfig::new("air-quality-003", ModuleKind::Sensor)
        .with_display_name("air-quality")
        .with_sensor_fields(["temp", "humi", "co2"]);
    let mut client = client_for(config, &server);
    client.connect().await.unwrap();

    assert_eq!(client.session_id(), Some("f00dfeed"));
}

#[tokio::test]
async fn test_http_200_with_success_false_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Invalid module type format",
            "code": "INVALID_TYPE_FORMAT"
        })))
        .mount(&server)
        .await;

    let config = ModuleConfig::new("S1", ModuleKind::Sensor)
        .with_display_name("temp")
        .with_sensor_fields(["temp"]);
    let mut client = client_for(config, &server);
    let err = client.connect().await.unwrap_err();

    match &err {
        AgentError::Rejected(msg) => assert_eq!(msg, "Invalid module type format"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), FailureKind::Protocol);
    assert!(!client.is_registered());
}

#[tokio::test]
async fn test_cutoff_registration_posts_module_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(json!({
            "umid": "CUTOFF-4242",
            "name": "Pump Relay",
            "poolId": "POOL007",
            "sensors": [],
            "isCutoffModule": true,
            "cutoffActive": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Module registered",
            "module": {"umid": "CUTOFF-4242", "sessionId": "abc"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ModuleConfig::new("CUTOFF-4242", ModuleKind::Cutoff)
        .with_display_name("Pump Relay")
        .with_pool_id("POOL007");
    let mut client = client_for(config, &server);
    client.connect().await.unwrap();

    assert_eq!(client.session_id(), Some("abc"));
}

#[tokio::test]
async fn test_non_success_status_is_protocol_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut client = client_for(ModuleConfig::new("C1", ModuleKind::Cutoff), &server);
    let err = client.connect().await.unwrap_err();

    assert!(matches!(err, AgentError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_heartbeat_carries_umid_and_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/heartbeat"))
        .and(body_json(json!({"umid": "C1", "sessionId": "s-9"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    transport(&server).heartbeat("C1", Some("s-9")).await.unwrap();
}

#[tokio::test]
async fn test_heartbeat_negative_ack_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/heartbeat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Module not found"
        })))
        .mount(&server)
        .await;

    let err = transport(&server).heartbeat("ghost", None).await.unwrap_err();
    assert!(matches!(err, AgentError::Rejected(msg) if msg == "Module not found"));
}

#[tokio::test]
async fn test_roster_accepts_both_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/modules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 2,
            "modules": [
                {"umid": "A", "cutoffActive": true},
                {"umid": "B"}
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/modules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "A", "cutoffActive": false}
        ])))
        .mount(&server)
        .await;

    let transport = transport(&server);
    let wrapped = transport.fetch_roster().await.unwrap();
    assert_eq!(wrapped.len(), 2);
    assert!(wrapped[0].cutoff_active);
    assert!(!wrapped[1].cutoff_active);

    let bare = transport.fetch_roster().await.unwrap();
    assert_eq!(bare.len(), 1);
    assert_eq!(bare[0].umid, "A");
}

#[tokio::test]
async fn test_roster_non_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/modules"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = transport(&server).fetch_roster().await.unwrap_err();
    assert!(matches!(err, AgentError::Json(_)));
    assert_eq!(err.kind(), FailureKind::Protocol);
}

#[tokio::test]
async fn test_publish_sends_session_tagged_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "session_id": "sess-1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/pool"))
        .and(body_partial_json(json!({
            "session_id": "sess-1",
            "umid": "power-monitor-006",
            "moduleType": "power-meter"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ModuleConfig::new("power-monitor-006", ModuleKind::Sensor)
        .with_display_name("power-meter")
        .with_sensor_fields(["voltage", "current", "power"]);
    let mut client = client_for(config, &server);
    client.connect().await.unwrap();
    let mut sensor = SensorModule::new(client);
    let payload = sensor.send_reading().await.unwrap();

    assert_eq!(payload.data.len(), 3);
    assert!(payload.data.values().all(|v| matches!(v, SensorValue::Float(_))));

    let requests = server.received_requests().await.unwrap();
    let pool_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/pool")
        .unwrap();
    let body: Value = serde_json::from_slice(&pool_request.body).unwrap();
    assert_eq!(body["data"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    // Nothing listens on the discard port
    let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let err = transport.fetch_roster().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Transport);
}
