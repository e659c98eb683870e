// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! JSON-over-HTTP transport for the ClusterFox server API

use crate::config::ModuleKind;
use crate::error::{AgentError, Result};
use crate::transport::{
    check_ack, parse_registration, parse_roster, ModuleTransport, RegistrationAck,
    RegistrationRequest, RosterEntry, SensorPayload,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, trace};

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// `ModuleTransport` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url` (e.g. `http://localhost:3000`)
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AgentError::InvalidConfig(format!("http client build failed: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing client
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, op: &str) -> Result<String> {
        let resp = request.send().await.map_err(|e| classify(e, op))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| classify(e, op))?;
        trace!("[CLIENT] {} -> {} ({} bytes)", op, status, body.len());

        if !status.is_success() {
            return Err(AgentError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn send_json(&self, request: reqwest::RequestBuilder, op: &str) -> Result<Value> {
        let body = self.send(request, op).await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!("[CLIENT] {} returned a non-JSON body: {}", op, body);
            AgentError::Json(e)
        })
    }

    /// 2xx with an empty or non-JSON body counts as acknowledged
    async fn send_ack(&self, request: reqwest::RequestBuilder, op: &str) -> Result<()> {
        let body = self.send(request, op).await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => check_ack(&value),
            Err(_) => Ok(()),
        }
    }
}

fn classify(error: reqwest::Error, op: &str) -> AgentError {
    if error.is_timeout() {
        AgentError::Timeout(format!("{op}: {error}"))
    } else {
        AgentError::Transport(error)
    }
}

#[async_trait]
impl ModuleTransport for HttpTransport {
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationAck> {
        let builder = match request.kind {
            ModuleKind::Sensor => self.client.get(self.url("/api/register")).query(&[
                ("umid", request.umid.as_str()),
                ("type", request.display_name.as_str()),
            ]),
            ModuleKind::Cutoff => self.client.post(self.url("/api/register")).json(&json!({
                "umid": request.umid,
                "name": request.display_name,
                "poolId": request.pool_id,
                "sensors": request.sensor_fields,
                "isCutoffModule": true,
                "cutoffActive": false,
            })),
        };
        let body = self.send_json(builder, "register").await?;
        parse_registration(request.kind, &body)
    }

    async fn heartbeat(&self, umid: &str, session_id: Option<&str>) -> Result<()> {
        let mut body = json!({ "umid": umid });
        if let Some(session_id) = session_id {
            body["sessionId"] = Value::String(session_id.to_string());
        }
        let builder = self.client.post(self.url("/api/heartbeat")).json(&body);
        self.send_ack(builder, "heartbeat").await
    }

    async fn fetch_roster(&self) -> Result<Vec<RosterEntry>> {
        let builder = self.client.get(self.url("/api/modules"));
        let body = self.send_json(builder, "fetch_roster").await?;
        parse_roster(&body)
    }

    async fn publish(&self, payload: &SensorPayload) -> Result<()> {
        let builder = self.client.post(self.url("/api/pool")).json(payload);
        self.send_ack(builder, "publish").await
    }
}
