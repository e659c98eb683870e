// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cutoff module polling and edge detection against a scripted roster

mod common;

use clusterfox_agent::{
    AgentError, CutoffModule, CutoffState, CutoffTransition, RelaySimulator,
};
use common::{client, cutoff_config, Call, RecordingTransport};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn registered_cutoff(umid: &str, transport: &Arc<RecordingTransport>) -> CutoffModule {
    let mut client = client(cutoff_config(umid), transport);
    client.connect().await.unwrap();
    CutoffModule::with_relay(client, RelaySimulator::new(Duration::ZERO))
}

fn roster(umid: &str, active: bool) -> Option<serde_json::Value> {
    Some(json!({"success": true, "count": 1, "modules": [{"umid": umid, "cutoffActive": active}]}))
}

#[tokio::test]
async fn test_false_true_true_false_yields_one_activation_then_one_deactivation() {
    let transport = RecordingTransport::new();
    transport.script_rosters([
        roster("CUTOFF-1001", false),
        roster("CUTOFF-1001", true),
        roster("CUTOFF-1001", true),
        roster("CUTOFF-1001", false),
    ]);
    let mut module = registered_cutoff("CUTOFF-1001", &transport).await;

    let mut events = Vec::new();
    for _ in 0..4 {
        if let Some(event) = module.check_status().await.unwrap() {
            events.push(event);
        }
    }

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], CutoffTransition::Activated { .. }));
    assert!(matches!(events[1], CutoffTransition::Deactivated { .. }));

    let summary = module.summary();
    assert_eq!(summary.activations, 1);
    assert_eq!(summary.deactivations, 1);
    assert_eq!(summary.state, CutoffState::Standby);
    assert!(summary.last_activation.is_some());
}

#[tokio::test]
async fn test_wrapped_roster_with_id_alias_activates() {
    let transport = RecordingTransport::new();
    transport.script_rosters([Some(json!({"modules": [{"id": "A", "cutoffActive": true}]}))]);
    let mut module = registered_cutoff("A", &transport).await;

    let event = module.check_status().await.unwrap();
    assert!(matches!(event, Some(CutoffTransition::Activated { .. })));
    assert!(module.machine().cutoff_active());
}

#[tokio::test]
async fn test_bare_list_roster_parses_the_same() {
    let transport = RecordingTransport::new();
    transport.script_rosters([
        Some(json!([{"id": "A", "cutoffActive": false}])),
        Some(json!([{"id": "A", "cutoffActive": true}])),
    ]);
    let mut module = registered_cutoff("A", &transport).await;

    assert_eq!(module.check_status().await.unwrap(), None);
    assert!(matches!(
        module.check_status().await.unwrap(),
        Some(CutoffTransition::Activated { .. })
    ));
}

#[tokio::test]
async fn test_missing_identifier_leaves_state_untouched() {
    let transport = RecordingTransport::new();
    transport.script_rosters([
        roster("A", true),
        Some(json!({"modules": [{"umid": "someone-else", "cutoffActive": false}]})),
        roster("A", true),
    ]);
    let mut module = registered_cutoff("A", &transport).await;

    assert!(module.check_status().await.unwrap().is_some());
    assert_eq!(module.check_status().await.unwrap(), None);
    assert!(module.machine().cutoff_active());
    // Seeing the same value again after the gap is not an edge
    assert_eq!(module.check_status().await.unwrap(), None);
    assert_eq!(module.machine().activation_count(), 1);
}

#[tokio::test]
async fn test_failed_poll_keeps_previous_state() {
    let transport = RecordingTransport::new();
    transport.script_rosters([roster("A", true), None, Some(json!("not a roster"))]);
    let mut module = registered_cutoff("A", &transport).await;

    module.check_status().await.unwrap();
    assert_eq!(module.check_status().await.unwrap(), None);
    assert_eq!(module.check_status().await.unwrap(), None);
    assert!(module.machine().cutoff_active());
    assert_eq!(module.machine().deactivation_count(), 0);
}

#[tokio::test]
async fn test_heartbeat_precedes_poll_every_cycle() {
    let transport = RecordingTransport::new();
    let mut module = registered_cutoff("A", &transport).await;

    module.check_status().await.unwrap();
    module.check_status().await.unwrap();

    assert_eq!(
        transport.calls(),
        vec![
            Call::Register("A".to_string()),
            Call::Heartbeat("A".to_string()),
            Call::FetchRoster,
            Call::Heartbeat("A".to_string()),
            Call::FetchRoster,
        ]
    );
}

#[tokio::test]
async fn test_heartbeat_failure_does_not_block_poll() {
    let transport = RecordingTransport::new();
    transport.fail_heartbeats(true);
    transport.script_rosters([roster("A", true)]);
    let mut module = registered_cutoff("A", &transport).await;

    let event = module.check_status().await.unwrap();
    assert!(matches!(event, Some(CutoffTransition::Activated { .. })));
    assert_eq!(module.heartbeat().failed(), 1);
    assert_eq!(module.summary().heartbeat_failures, 1);
}

#[tokio::test]
async fn test_unregistered_cutoff_makes_no_calls() {
    let transport = RecordingTransport::new();
    let mut module = CutoffModule::new(client(cutoff_config("A"), &transport));

    let err = module.check_status().await.unwrap_err();
    assert!(matches!(err, AgentError::NotRegistered));
    assert!(transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_relay_delay_applies_only_on_transition() {
    let transport = RecordingTransport::new();
    transport.script_rosters([roster("A", false), roster("A", true)]);
    let mut client = client(cutoff_config("A"), &transport);
    client.connect().await.unwrap();
    let mut module = CutoffModule::new(client);

    let start = tokio::time::Instant::now();
    module.check_status().await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(100));

    let start = tokio::time::Instant::now();
    module.check_status().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_every_check_records_its_status_time() {
    let transport = RecordingTransport::new();
    transport.script_rosters([roster("A", false), None]);
    let mut module = registered_cutoff("A", &transport).await;
    assert!(module.last_check().is_none());

    // Steady state: no edge, still a check
    assert_eq!(module.check_status().await.unwrap(), None);
    let first = module.last_check().unwrap();

    // Failed poll: still a check
    assert_eq!(module.check_status().await.unwrap(), None);
    let second = module.last_check().unwrap();
    assert!(second >= first);
    assert_eq!(module.machine().state(), CutoffState::Standby);
}
