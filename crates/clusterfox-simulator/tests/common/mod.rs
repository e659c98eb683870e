// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Mock ClusterFox server shared by the simulator integration tests

#![allow(dead_code)]

use clusterfox_config::{ModuleEntry, SimulatorConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Server that accepts every registration, heartbeat and reading
pub async fn accepting_server(cutoff_active: bool, cutoff_umid: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Module registered successfully",
            "session_id": "sess-1",
            "status": "new"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "module": { "umid": cutoff_umid, "sessionId": "sess-cutoff" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/heartbeat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/modules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "modules": [{ "umid": cutoff_umid, "cutoffActive": cutoff_active }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/pool"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    server
}

/// Config pointed at `url` with no pacing delays and a one-second cadence
pub fn fast_config(url: &str) -> SimulatorConfig {
    let mut config = SimulatorConfig::default();
    config.server.url = url.to_string();
    config.server.request_timeout_ms = 2000;
    config.timing.interval_secs = 1;
    config.timing.duration_secs = 1;
    config.timing.registration_delay_ms = 0;
    config.timing.device_spacing_ms = 0;
    config.timing.relay_delay_ms = 0;
    config.cutoff.poll_interval_secs = 1;
    config.modules = vec![
        ModuleEntry::new("temp-humi-sensor-001", "temperature-humidity", &["temp", "humi"]),
        ModuleEntry::new("co2-sensor-001", "co2", &["co2"]),
    ];
    config
}

pub async fn requests_to(server: &MockServer, verb: &str, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == route)
        .count()
}
