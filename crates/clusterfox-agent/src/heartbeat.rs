// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Heartbeat reporter for maintaining module liveness
//!
//! Heartbeats are driven by the caller's cycle rather than a background task:
//! a cutoff module beats once right before every roster poll. A failed beat is
//! logged and forgotten; the next cycle is the retry.

use crate::client::ModuleClient;
use crate::error::Result;
use tracing::{debug, warn};

/// Per-module heartbeat bookkeeping
#[derive(Debug, Default, Clone)]
pub struct HeartbeatReporter {
    sent: u64,
    failed: u64,
}

impl HeartbeatReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send one heartbeat, propagating the failure
    pub async fn send_heartbeat(client: &ModuleClient) -> Result<()> {
        client.ensure_registered()?;
        client
            .transport()
            .heartbeat(client.umid(), client.session_id())
            .await
    }

    /// Send one heartbeat; failures are logged and counted, never returned
    pub async fn beat(&mut self, client: &ModuleClient) -> bool {
        match Self::send_heartbeat(client).await {
            Ok(()) => {
                self.sent += 1;
                debug!("[HEARTBEAT] ✓ {}", client.umid());
                true
            }
            Err(e) => {
                self.failed += 1;
                warn!("[HEARTBEAT] ⚠ Heartbeat failed for {}: {}", client.umid(), e);
                false
            }
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }
}
