// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulated relay hardware driven by cutoff transitions

use crate::generator::round_to;
use rand::Rng;
use std::time::Duration;
use tracing::info;

/// Settling delay before the relay reports its new position
pub const DEFAULT_ACTUATION_DELAY: Duration = Duration::from_millis(100);

const CONTACT_RESISTANCE_OHMS: (f64, f64) = (0.001, 0.005);
const SWITCHING_TIME_MS: (u32, u32) = (5, 15);

/// Relay position change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayAction {
    /// Contacts open, equipment disconnected
    Open,
    /// Contacts closed, power restored
    Close,
}

/// Synthesized electrical readings for one actuation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelayReport {
    pub action: RelayAction,
    pub contact_resistance_ohms: f64,
    /// Only reported when opening
    pub switching_time_ms: Option<u32>,
}

impl RelayReport {
    /// Draw readings for an actuation
    pub fn measure<R: Rng + ?Sized>(action: RelayAction, rng: &mut R) -> Self {
        let (lo, hi) = CONTACT_RESISTANCE_OHMS;
        let contact_resistance_ohms = round_to(rng.gen_range(lo..=hi), 4);
        let switching_time_ms = match action {
            RelayAction::Open => Some(rng.gen_range(SWITCHING_TIME_MS.0..=SWITCHING_TIME_MS.1)),
            RelayAction::Close => None,
        };
        Self {
            action,
            contact_resistance_ohms,
            switching_time_ms,
        }
    }
}

/// Relay side effect runner. Logging only; never touches protocol state.
#[derive(Debug, Clone)]
pub struct RelaySimulator {
    actuation_delay: Duration,
}

impl Default for RelaySimulator {
    fn default() -> Self {
        Self::new(DEFAULT_ACTUATION_DELAY)
    }
}

impl RelaySimulator {
    pub fn new(actuation_delay: Duration) -> Self {
        Self { actuation_delay }
    }

    pub async fn actuate(&self, name: &str, action: RelayAction) -> RelayReport {
        match action {
            RelayAction::Open => info!("[CUTOFF] [{}] Shutting down connected equipment...", name),
            RelayAction::Close => info!("[CUTOFF] [{}] Restoring power to equipment...", name),
        }

        if !self.actuation_delay.is_zero() {
            tokio::time::sleep(self.actuation_delay).await;
        }

        let report = RelayReport::measure(action, &mut rand::thread_rng());
        match action {
            RelayAction::Open => info!(
                "[CUTOFF] [{}] Relay opened, power disconnected (contact {:.4} Ω, switched in {} ms)",
                name,
                report.contact_resistance_ohms,
                report.switching_time_ms.unwrap_or_default()
            ),
            RelayAction::Close => info!(
                "[CUTOFF] [{}] Relay closed, power restored (contact resistance {:.4} Ω)",
                name, report.contact_resistance_ohms
            ),
        }
        report
    }
}
