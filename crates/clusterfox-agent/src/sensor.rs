// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sensor producer: synthesize a reading per cycle and push it to the pool

use crate::client::ModuleClient;
use crate::error::{AgentError, Result};
use crate::generator::generate_value;
use crate::transport::SensorPayload;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug)]
pub struct SensorModule {
    client: ModuleClient,
    published: u64,
    failed: u64,
}

impl SensorModule {
    pub fn new(client: ModuleClient) -> Self {
        Self {
            client,
            published: 0,
            failed: 0,
        }
    }

    pub fn client(&self) -> &ModuleClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ModuleClient {
        &mut self.client
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Draw one value per declared field and tag it with the session
    pub fn build_payload<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SensorPayload> {
        self.client.ensure_registered()?;
        let session_id = self
            .client
            .session_id()
            .ok_or(AgentError::NotRegistered)?
            .to_string();

        let config = self.client.config();
        let data: BTreeMap<_, _> = config
            .sensor_fields
            .iter()
            .map(|field| (field.clone(), generate_value(field, rng)))
            .collect();

        Ok(SensorPayload {
            session_id,
            umid: config.umid.clone(),
            module_type: config.display_name.clone(),
            data,
        })
    }

    /// Synthesize and publish one reading
    pub async fn send_reading(&mut self) -> Result<SensorPayload> {
        let payload = self.build_payload(&mut rand::thread_rng())?;

        match self.client.transport().publish(&payload).await {
            Ok(()) => {
                self.published += 1;
                info!(
                    "[SENSOR] ✓ [{}] Data sent: {}",
                    payload.umid,
                    format_readings(&payload)
                );
                Ok(payload)
            }
            Err(e) => {
                self.failed += 1;
                warn!("[SENSOR] ✗ [{}] Failed to send data: {}", payload.umid, e);
                Err(e)
            }
        }
    }
}

fn format_readings(payload: &SensorPayload) -> String {
    payload
        .data
        .iter()
        .map(|(field, value)| format!("{field}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
