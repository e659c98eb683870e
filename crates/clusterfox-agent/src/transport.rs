// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transport seam between simulated modules and the ClusterFox server
//!
//! The simulator only needs four request/response operations. `ModuleTransport`
//! abstracts them so the client, cutoff poller and scheduler can run against the
//! real HTTP server (`HttpTransport`) or an in-memory double in tests.
//!
//! Response interpretation (acknowledgment flags, roster shapes, session id
//! extraction) lives here as plain functions over `serde_json::Value`, so every
//! transport shares the same semantics.

use crate::config::{ModuleConfig, ModuleKind};
use crate::error::{AgentError, Result};
use crate::generator::SensorValue;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything the server needs to register one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub umid: String,
    pub kind: ModuleKind,
    /// Module type (sensor) or name (cutoff)
    pub display_name: String,
    pub pool_id: String,
    pub sensor_fields: Vec<String>,
}

impl From<&ModuleConfig> for RegistrationRequest {
    fn from(config: &ModuleConfig) -> Self {
        Self {
            umid: config.umid.clone(),
            kind: config.kind,
            display_name: config.display_name.clone(),
            pool_id: config.pool_id.clone(),
            sensor_fields: config.sensor_fields.clone(),
        }
    }
}

/// Positive registration acknowledgment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationAck {
    /// Session token; always present on the sensor path
    pub session_id: Option<String>,
    /// Server message, if any
    pub message: Option<String>,
    /// `new` or `existing` on the sensor path
    pub status: Option<String>,
}

/// One module's entry in the server roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub umid: String,
    pub cutoff_active: bool,
}

/// Data push body for `/api/pool`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorPayload {
    pub session_id: String,
    pub umid: String,
    #[serde(rename = "moduleType")]
    pub module_type: String,
    pub data: BTreeMap<String, SensorValue>,
}

/// Request/response capability used by every simulated module
#[async_trait]
pub trait ModuleTransport: Send + Sync {
    /// Single registration call. No retries.
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationAck>;

    /// Liveness signal for a registered module
    async fn heartbeat(&self, umid: &str, session_id: Option<&str>) -> Result<()>;

    /// Full snapshot of all modules' remote state
    async fn fetch_roster(&self) -> Result<Vec<RosterEntry>>;

    /// Push one reading
    async fn publish(&self, payload: &SensorPayload) -> Result<()>;
}

/// Best error text the server gave: `error`, then `message`, then the raw body
pub fn server_error_text(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

/// Fail with `Rejected` when the body carries an explicit negative acknowledgment.
///
/// The server answers HTTP 200 with `success: false` on validation errors, so the
/// status code alone is not enough.
pub fn check_ack(body: &Value) -> Result<()> {
    match body.get("success") {
        Some(Value::Bool(false)) => Err(AgentError::Rejected(server_error_text(body))),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("error") => {
            Err(AgentError::Rejected(server_error_text(body)))
        }
        _ => Ok(()),
    }
}

/// Interpret a registration response body for the given module kind
pub fn parse_registration(kind: ModuleKind, body: &Value) -> Result<RegistrationAck> {
    if !body.is_object() {
        return Err(AgentError::MalformedResponse(format!(
            "registration response is not an object: {}",
            body
        )));
    }
    check_ack(body)?;

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    match kind {
        ModuleKind::Sensor => {
            let session_id = body
                .get("session_id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AgentError::MalformedResponse(
                        "registration succeeded without session_id".to_string(),
                    )
                })?;
            Ok(RegistrationAck {
                session_id: Some(session_id.to_string()),
                message,
                status: body
                    .get("status")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        }
        ModuleKind::Cutoff => {
            let session_id = body
                .get("module")
                .and_then(|m| m.get("sessionId").or_else(|| m.get("session_id")))
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok(RegistrationAck {
                session_id,
                message,
                status: None,
            })
        }
    }
}

/// Parse a roster snapshot: either a bare list or `{ "modules": [...] }`.
///
/// Entries are matched by `umid`, falling back to `id`. Entries with neither are
/// skipped. A missing `cutoffActive` reads as `false`.
pub fn parse_roster(body: &Value) -> Result<Vec<RosterEntry>> {
    let list = match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("modules") {
            Some(Value::Array(items)) => items,
            _ => {
                check_ack(body)?;
                return Err(AgentError::MalformedResponse(
                    "roster object has no 'modules' list".to_string(),
                ));
            }
        },
        other => {
            return Err(AgentError::MalformedResponse(format!(
                "unexpected roster shape: {}",
                other
            )))
        }
    };

    let mut entries = Vec::with_capacity(list.len());
    for item in list {
        let umid = item
            .get("umid")
            .or_else(|| item.get("id"))
            .and_then(Value::as_str);
        match umid {
            Some(umid) => entries.push(RosterEntry {
                umid: umid.to_string(),
                cutoff_active: item
                    .get("cutoffActive")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            None => debug!("[CLIENT] Skipping roster entry without identifier: {}", item),
        }
    }
    Ok(entries)
}

/// Locate a module in a roster snapshot
pub fn find_in_roster<'a>(roster: &'a [RosterEntry], umid: &str) -> Option<&'a RosterEntry> {
    roster.iter().find(|entry| entry.umid == umid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sensor_registration_requires_session_id() {
        let ack = parse_registration(
            ModuleKind::Sensor,
            &json!({"success": true, "session_id": "abc123", "status": "new"}),
        )
        .unwrap();
        assert_eq!(ack.session_id.as_deref(), Some("abc123"));
        assert_eq!(ack.status.as_deref(), Some("new"));

        let err = parse_registration(ModuleKind::Sensor, &json!({"success": true})).unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[test]
    fn test_negative_ack_uses_error_text() {
        let err = parse_registration(
            ModuleKind::Sensor,
            &json!({"success": false, "error": "Invalid UMID format", "message": "ignored"}),
        )
        .unwrap_err();
        match err {
            AgentError::Rejected(msg) => assert_eq!(msg, "Invalid UMID format"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cutoff_registration_session_optional() {
        let ack = parse_registration(
            ModuleKind::Cutoff,
            &json!({"success": true, "module": {"sessionId": "s-1"}}),
        )
        .unwrap();
        assert_eq!(ack.session_id.as_deref(), Some("s-1"));

        let ack = parse_registration(ModuleKind::Cutoff, &json!({"success": true})).unwrap();
        assert_eq!(ack.session_id, None);
    }

    #[test]
    fn test_non_object_registration_is_malformed() {
        let err = parse_registration(ModuleKind::Cutoff, &json!("ok")).unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[test]
    fn test_roster_wrapped_and_bare() {
        let wrapped =
            parse_roster(&json!({"modules": [{"id": "A", "cutoffActive": true}]})).unwrap();
        assert_eq!(
            wrapped,
            vec![RosterEntry {
                umid: "A".to_string(),
                cutoff_active: true
            }]
        );

        let bare = parse_roster(&json!([{"id": "A", "cutoffActive": false}])).unwrap();
        assert!(!bare[0].cutoff_active);
    }

    #[test]
    fn test_roster_umid_preferred_and_flag_defaults_false() {
        let roster = parse_roster(&json!([
            {"umid": "B", "id": "ignored"},
            {"cutoffActive": true},
        ]))
        .unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].umid, "B");
        assert!(!roster[0].cutoff_active);
        assert!(find_in_roster(&roster, "B").is_some());
        assert!(find_in_roster(&roster, "ignored").is_none());
    }

    #[test]
    fn test_roster_failure_shapes() {
        assert!(matches!(
            parse_roster(&json!({"success": false, "error": "Database unavailable"})),
            Err(AgentError::Rejected(_))
        ));
        assert!(matches!(
            parse_roster(&json!({"count": 0})),
            Err(AgentError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_roster(&json!(42)),
            Err(AgentError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_payload_serializes_wire_names() {
        let mut data = BTreeMap::new();
        data.insert("co2".to_string(), SensorValue::Integer(812));
        let payload = SensorPayload {
            session_id: "s".to_string(),
            umid: "SENSOR003".to_string(),
            module_type: "air-quality".to_string(),
            data,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["moduleType"], "air-quality");
        assert_eq!(value["session_id"], "s");
        assert_eq!(value["data"]["co2"], 812);
    }
}
