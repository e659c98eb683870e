// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use clusterfox_agent::transport::parse_roster;
use clusterfox_agent::{
    AgentError, ModuleClient, ModuleConfig, ModuleKind, ModuleTransport, RegistrationAck,
    RegistrationRequest, Result, RosterEntry, SensorPayload,
};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// One transport call as seen by the server
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register(String),
    Heartbeat(String),
    FetchRoster,
    Publish(SensorPayload),
}

/// In-memory transport that records every call and replays scripted rosters
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    rejected: Mutex<HashSet<String>>,
    /// `None` entries simulate a failed poll
    rosters: Mutex<VecDeque<Option<Value>>>,
    failing_heartbeats: Mutex<bool>,
    failing_publishes: Mutex<bool>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registration for `umid` will be answered with `success: false`
    pub fn reject(&self, umid: &str) {
        self.rejected.lock().unwrap().insert(umid.to_string());
    }

    /// Queue roster bodies, consumed one per poll
    pub fn script_rosters<I: IntoIterator<Item = Option<Value>>>(&self, rosters: I) {
        self.rosters.lock().unwrap().extend(rosters);
    }

    pub fn fail_heartbeats(&self, fail: bool) {
        *self.failing_heartbeats.lock().unwrap() = fail;
    }

    pub fn fail_publishes(&self, fail: bool) {
        *self.failing_publishes.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn publishes_for(&self, umid: &str) -> Vec<SensorPayload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Publish(payload) if payload.umid == umid => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// Calls other than registration that mention `umid`
    pub fn activity_for(&self, umid: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| match call {
                Call::Heartbeat(id) => id == umid,
                Call::Publish(payload) => payload.umid == umid,
                _ => false,
            })
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ModuleTransport for RecordingTransport {
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationAck> {
        self.record(Call::Register(request.umid.clone()));
        if self.rejected.lock().unwrap().contains(&request.umid) {
            return Err(AgentError::Rejected("Invalid UMID format".to_string()));
        }
        Ok(RegistrationAck {
            session_id: Some(format!("session-{}", request.umid)),
            message: Some("Module registered successfully".to_string()),
            status: Some("new".to_string()),
        })
    }

    async fn heartbeat(&self, umid: &str, _session_id: Option<&str>) -> Result<()> {
        self.record(Call::Heartbeat(umid.to_string()));
        if *self.failing_heartbeats.lock().unwrap() {
            return Err(AgentError::HttpStatus {
                status: 500,
                body: "heartbeat store unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn fetch_roster(&self) -> Result<Vec<RosterEntry>> {
        self.record(Call::FetchRoster);
        let next = self.rosters.lock().unwrap().pop_front();
        match next {
            Some(Some(body)) => parse_roster(&body),
            Some(None) => Err(AgentError::Timeout("scripted poll failure".to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn publish(&self, payload: &SensorPayload) -> Result<()> {
        self.record(Call::Publish(payload.clone()));
        if *self.failing_publishes.lock().unwrap() {
            return Err(AgentError::Rejected("Invalid session".to_string()));
        }
        Ok(())
    }
}

pub fn sensor_config(umid: &str, fields: &[&str]) -> ModuleConfig {
    ModuleConfig::new(umid, ModuleKind::Sensor)
        .with_display_name("temperature-humidity")
        .with_sensor_fields(fields.iter().copied())
}

pub fn cutoff_config(umid: &str) -> ModuleConfig {
    ModuleConfig::new(umid, ModuleKind::Cutoff).with_display_name("Test Relay")
}

pub fn client(config: ModuleConfig, transport: &Arc<RecordingTransport>) -> ModuleClient {
    let transport: Arc<dyn ModuleTransport> = transport.clone();
    ModuleClient::new(config, transport).expect("valid test config")
}
